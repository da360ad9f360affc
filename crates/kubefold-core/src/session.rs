//! Render session and pipeline driver
//!
//! A `Session` holds the read-only settings tree for one environment and
//! drives the render pipeline: read template text, substitute markers,
//! parse the YAML stream, expand secrets directives in every document,
//! and write the result back out. Each stage failure aborts the whole
//! render; the output file is either absent or from a prior run.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::subst;
use crate::transform::transform_document;
use crate::value::Value;

/// Environment used when the caller supplies an empty or one-character name
pub const DEFAULT_ENVIRONMENT: &str = "beta";

/// Options for a render session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Base directory for relative secrets-file paths in import directives
    pub base_path: Option<PathBuf>,
}

/// External process-invocation facility
///
/// The pipeline only renders command strings; executing them belongs to
/// the caller. Implementations receive the fully substituted command.
pub trait CommandRunner {
    /// Run the substituted command string
    fn run(&self, command: &str) -> Result<()>;
}

/// A render session for one environment
///
/// Owns the settings tree for the lifetime of the session; documents
/// produced during a render are transient and discarded after writing.
pub struct Session {
    env: String,
    settings: Value,
    options: SessionOptions,
}

impl Session {
    /// Create a session for the given environment name and settings tree.
    ///
    /// Names of length 0 or 1 fall back to [`DEFAULT_ENVIRONMENT`].
    pub fn new(env_name: impl Into<String>, settings: Value) -> Self {
        Self::with_options(env_name, settings, SessionOptions::default())
    }

    /// Create a session with explicit options
    pub fn with_options(
        env_name: impl Into<String>,
        settings: Value,
        options: SessionOptions,
    ) -> Self {
        let env_name = env_name.into();
        let env = if env_name.chars().count() > 1 {
            env_name
        } else {
            DEFAULT_ENVIRONMENT.to_string()
        };

        Self {
            env,
            settings,
            options,
        }
    }

    /// The environment this session renders for
    pub fn env(&self) -> &str {
        &self.env
    }

    /// The settings tree backing variable resolution
    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Render a template file to an output path.
    ///
    /// Creates or truncates the output file. Nothing is written when any
    /// pipeline stage fails.
    pub fn render_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();
        log::debug!(
            "rendering {} -> {} (env: {})",
            input.display(),
            output.display(),
            self.env
        );

        let raw = std::fs::read_to_string(input)
            .map_err(|e| Error::io(input.display().to_string(), e.to_string()))?;

        let rendered = self.render_str(&raw)?;

        std::fs::write(output, rendered)
            .map_err(|e| Error::io(output.display().to_string(), e.to_string()))
    }

    /// Render template text into a multi-document YAML string.
    ///
    /// Stages: marker substitution over the raw text, YAML stream parse,
    /// document fan-out, per-document secrets expansion, serialization.
    /// Deserializing into the owned [`Value`] tree expands YAML anchors
    /// and aliases, so the transform stage never observes shared
    /// substructures.
    pub fn render_str(&self, raw: &str) -> Result<String> {
        let substituted = subst::substitute(raw, &self.settings)?;

        let mut documents = resolve_document_list(parse_documents(&substituted)?)?;
        log::trace!("render produced {} document(s)", documents.len());

        let base = self.options.base_path.as_deref();
        let mut out = String::new();
        for doc in &mut documents {
            transform_document(doc, base)?;
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(doc).map_err(|e| Error::parse(e.to_string()))?);
        }

        Ok(out)
    }

    /// Substitute markers in a command template
    pub fn render_command(&self, template: &str) -> Result<String> {
        subst::substitute(template, &self.settings)
    }

    /// Substitute markers in a command template, then hand the result to
    /// the execution collaborator
    pub fn run_command(&self, template: &str, runner: &dyn CommandRunner) -> Result<()> {
        let command = self.render_command(template)?;
        log::debug!("running command: {}", command);
        runner.run(&command)
    }
}

/// Parse a YAML stream into its documents.
///
/// Deserializing into the owned [`Value`] tree expands anchors and
/// aliases into independent values.
pub fn parse_documents(text: &str) -> Result<Vec<Value>> {
    let mut parsed = Vec::new();
    for de in serde_yaml::Deserializer::from_str(text) {
        parsed.push(Value::deserialize(de).map_err(|e| Error::parse(e.to_string()))?);
    }
    Ok(parsed)
}

/// Resolve the list of documents to transform.
///
/// A single mapping root with a top-level `documents` key fans out into
/// that key's sequence (the rest of the root is discarded); any other
/// stream is processed document by document.
fn resolve_document_list(mut parsed: Vec<Value>) -> Result<Vec<Value>> {
    if parsed.len() == 1 {
        if let Some(map) = parsed[0].as_mapping_mut() {
            if let Some(documents) = map.shift_remove("documents") {
                return match documents {
                    Value::Sequence(docs) => Ok(docs),
                    other => Err(Error::precondition(format!(
                        "'documents' must be a list, got {}",
                        other.type_name()
                    ))),
                };
            }
        }
    }

    Ok(parsed)
}
