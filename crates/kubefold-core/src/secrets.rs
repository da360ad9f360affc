//! Secrets auto-import
//!
//! A container spec can request automatic env-var expansion of a secrets
//! bundle with the shorthand:
//!
//! ```yaml
//! import_secrets: ['./secrets.yml', 'packing-beta-secrets']
//! ```
//!
//! The referenced file is a single YAML document with a top-level `data`
//! mapping. Every key produces one env-var descriptor referencing the
//! bundle in the secret store:
//!
//! ```yaml
//! name: PAPER_TRAIL_PORT
//! valueFrom:
//!   secretKeyRef:
//!     name: packing-beta-secrets
//!     key: paper_trail_port
//! ```
//!
//! Descriptors are emitted in the parse order of `data`, so rendered
//! output is stable across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::value::Value;

/// The `import_secrets` shorthand: secrets file path plus bundle name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    /// Path to the secrets YAML file
    pub path: String,
    /// Logical name of the secrets bundle in the secret store
    pub bundle: String,
}

impl ImportDirective {
    /// Parse a directive from its document form: a 2-element sequence of strings
    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value.as_sequence().ok_or_else(|| {
            Error::precondition(format!(
                "import_secrets must be a 2-element list, got {}",
                value.type_name()
            ))
        })?;

        match items {
            [Value::String(path), Value::String(bundle)] => Ok(Self {
                path: path.clone(),
                bundle: bundle.clone(),
            }),
            _ => Err(Error::precondition(
                "import_secrets must be [secrets_file_path, bundle_name]",
            )
            .with_help("Example: import_secrets: ['./secrets.yml', 'packing-beta-secrets']")),
        }
    }
}

/// Reference to one key of a named secrets bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeyRef {
    /// The bundle name in the secret store
    pub name: String,
    /// The key within the bundle
    pub key: String,
}

/// Indirection wrapper matching the deployment-platform wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFrom {
    #[serde(rename = "secretKeyRef")]
    pub secret_key_ref: SecretKeyRef,
}

/// One env-var entry produced by secrets expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDescriptor {
    /// Env var name: the uppercased secrets key
    pub name: String,
    #[serde(rename = "valueFrom")]
    pub value_from: ValueFrom,
}

impl SecretDescriptor {
    /// Convert to the document tree form appended into a container's env list
    pub fn to_value(&self) -> Value {
        let mut key_ref = IndexMap::new();
        key_ref.insert(
            "name".to_string(),
            Value::String(self.value_from.secret_key_ref.name.clone()),
        );
        key_ref.insert(
            "key".to_string(),
            Value::String(self.value_from.secret_key_ref.key.clone()),
        );

        let mut value_from = IndexMap::new();
        value_from.insert("secretKeyRef".to_string(), Value::Mapping(key_ref));

        let mut entry = IndexMap::new();
        entry.insert("name".to_string(), Value::String(self.name.clone()));
        entry.insert("valueFrom".to_string(), Value::Mapping(value_from));

        Value::Mapping(entry)
    }
}

/// Expand a secrets file into env-var descriptors for the given bundle.
///
/// Reads and parses the file, then emits one descriptor per key of its
/// top-level `data` mapping, in parse order.
pub fn expand_secrets(path: &Path, bundle: &str) -> Result<Vec<SecretDescriptor>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(path.display().to_string(), e.to_string()))?;

    let doc: Value = serde_yaml::from_str(&content)
        .map_err(|e| Error::parse(e.to_string()).with_path(path.display().to_string()))?;

    let data = doc
        .get_path("data")
        .ok()
        .and_then(|v| v.as_mapping())
        .ok_or_else(|| {
            Error::precondition(format!(
                "secrets file '{}' has no top-level 'data' mapping",
                path.display()
            ))
        })?;

    log::debug!(
        "expanding {} secrets from {} into bundle '{}'",
        data.len(),
        path.display(),
        bundle
    );

    Ok(data
        .keys()
        .map(|key| SecretDescriptor {
            name: key.to_uppercase(),
            value_from: ValueFrom {
                secret_key_ref: SecretKeyRef {
                    name: bundle.to_string(),
                    key: key.clone(),
                },
            },
        })
        .collect())
}
