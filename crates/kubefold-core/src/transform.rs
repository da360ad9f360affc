//! Manifest document transformation
//!
//! Walks a parsed document to `spec.template.spec.containers` and expands
//! any `import_secrets` directive into explicit env entries. The container
//! list is rebuilt rather than mutated during iteration.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::secrets::{expand_secrets, ImportDirective};
use crate::value::Value;

/// Expand secrets-import directives in a single document, in place.
///
/// Documents without a `spec.template.spec.containers` list are left
/// untouched. Containers carrying `import_secrets` must already have an
/// `env` list; its absence is a precondition violation, not a silent
/// drop of the secret entries.
pub fn transform_document(doc: &mut Value, base: Option<&Path>) -> Result<()> {
    let containers = match doc.get_path_mut("spec.template.spec.containers") {
        Ok(value) => match value.as_sequence_mut() {
            Some(seq) => seq,
            None => return Ok(()),
        },
        Err(_) => return Ok(()),
    };

    let mut expanded = Vec::with_capacity(containers.len());
    for container in std::mem::take(containers) {
        expanded.push(expand_container(container, base)?);
    }
    *containers = expanded;

    Ok(())
}

/// Expand a single container entry, passing through entries without a directive
fn expand_container(container: Value, base: Option<&Path>) -> Result<Value> {
    let mut map = match container {
        Value::Mapping(map) => map,
        other => return Ok(other),
    };

    let directive = match map.shift_remove("import_secrets") {
        Some(value) => ImportDirective::from_value(&value)?,
        None => return Ok(Value::Mapping(map)),
    };

    let descriptors = expand_secrets(&secrets_path(&directive.path, base), &directive.bundle)?;

    let name = container_name(&map).to_string();
    let env = map
        .get_mut("env")
        .and_then(Value::as_sequence_mut)
        .ok_or_else(|| {
            Error::precondition(format!(
                "container '{}' has import_secrets but no env list",
                name
            ))
            .with_help("Add an env list (it may be empty) to the container")
        })?;

    env.extend(descriptors.iter().map(|d| d.to_value()));

    Ok(Value::Mapping(map))
}

/// Resolve a directive path against the session base directory
fn secrets_path(path: &str, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) if Path::new(path).is_relative() => base.join(path),
        _ => PathBuf::from(path),
    }
}

fn container_name(map: &indexmap::IndexMap<String, Value>) -> &str {
    map.get("name").and_then(Value::as_str).unwrap_or("<unnamed>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn secrets_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data:\n  paper_trail_port: '1234'\n  api_key: secret\n")
            .unwrap();
        file
    }

    fn deployment_doc(secrets_path: &str, env: &str) -> Value {
        let yaml = format!(
            r#"
spec:
  template:
    spec:
      containers:
        - name: app
          import_secrets: ['{}', 'bundle-x']
          {}
        - name: static
          static_env: true
"#,
            secrets_path, env
        );
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[test]
    fn test_expands_directive_into_env() {
        let file = secrets_file();
        let mut doc = deployment_doc(&file.path().display().to_string(), "env: []");

        transform_document(&mut doc, None).unwrap();

        let containers = doc
            .get_path("spec.template.spec.containers")
            .unwrap()
            .as_sequence()
            .unwrap();

        let app = containers[0].as_mapping().unwrap();
        assert!(!app.contains_key("import_secrets"));

        let env = app.get("env").unwrap().as_sequence().unwrap();
        assert_eq!(env.len(), 2);

        let first = env[0].as_mapping().unwrap();
        assert_eq!(first.get("name").unwrap().as_str(), Some("PAPER_TRAIL_PORT"));
        assert_eq!(
            env[0].get_path("valueFrom.secretKeyRef.name").unwrap().as_str(),
            Some("bundle-x")
        );
        assert_eq!(
            env[0].get_path("valueFrom.secretKeyRef.key").unwrap().as_str(),
            Some("paper_trail_port")
        );
    }

    #[test]
    fn test_appends_after_existing_env_entries() {
        let file = secrets_file();
        let mut doc = deployment_doc(
            &file.path().display().to_string(),
            "env: [{name: RAILS_ENV, value: production}]",
        );

        transform_document(&mut doc, None).unwrap();

        let env_path = "spec.template.spec.containers";
        let containers = doc.get_path(env_path).unwrap().as_sequence().unwrap();
        let env = containers[0].as_mapping().unwrap().get("env").unwrap();
        let env = env.as_sequence().unwrap();

        assert_eq!(env.len(), 3);
        assert_eq!(
            env[0].as_mapping().unwrap().get("name").unwrap().as_str(),
            Some("RAILS_ENV")
        );
        assert_eq!(
            env[1].as_mapping().unwrap().get("name").unwrap().as_str(),
            Some("PAPER_TRAIL_PORT")
        );
    }

    #[test]
    fn test_containers_without_directive_untouched() {
        let file = secrets_file();
        let mut doc = deployment_doc(&file.path().display().to_string(), "env: []");

        transform_document(&mut doc, None).unwrap();

        let containers = doc
            .get_path("spec.template.spec.containers")
            .unwrap()
            .as_sequence()
            .unwrap();
        let static_container = containers[1].as_mapping().unwrap();
        assert_eq!(static_container.get("static_env").unwrap().as_bool(), Some(true));
        assert!(!static_container.contains_key("env"));
    }

    #[test]
    fn test_missing_containers_path_is_noop() {
        let mut doc: Value = serde_yaml::from_str("name: 'Document 1'").unwrap();
        let before = doc.clone();

        transform_document(&mut doc, None).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_missing_env_is_precondition_violation() {
        let file = secrets_file();
        let mut doc = deployment_doc(&file.path().display().to_string(), "image: app:latest");

        let err = transform_document(&mut doc, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Precondition);
        assert!(err.cause.as_deref().unwrap().contains("app"));
    }

    #[test]
    fn test_env_of_wrong_type_is_precondition_violation() {
        let file = secrets_file();
        let mut doc = deployment_doc(&file.path().display().to_string(), "env: not-a-list");

        let err = transform_document(&mut doc, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Precondition);
    }

    #[test]
    fn test_malformed_directive_fails() {
        let mut doc: Value = serde_yaml::from_str(
            r#"
spec:
  template:
    spec:
      containers:
        - name: app
          import_secrets: 'secrets.yml'
          env: []
"#,
        )
        .unwrap();

        let err = transform_document(&mut doc, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Precondition);
    }

    #[test]
    fn test_relative_secrets_path_uses_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secrets.yml"), "data:\n  api_key: x\n").unwrap();

        let mut doc = deployment_doc("secrets.yml", "env: []");
        transform_document(&mut doc, Some(dir.path())).unwrap();

        let containers = doc
            .get_path("spec.template.spec.containers")
            .unwrap()
            .as_sequence()
            .unwrap();
        let env = containers[0].as_mapping().unwrap().get("env").unwrap();
        assert_eq!(env.as_sequence().unwrap().len(), 1);
    }
}
