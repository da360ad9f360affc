//! kubefold-core: deployment-manifest templating
//!
//! This crate renders YAML manifest templates for one environment:
//! `#{dotted.path}` markers are substituted from a settings tree,
//! `import_secrets` directives are expanded into explicit env entries,
//! and the result is written as a multi-document YAML stream.
//!
//! # Example
//!
//! ```rust
//! use kubefold_core::{Session, Value};
//!
//! let settings: Value = serde_yaml::from_str(
//!     "deployment:\n  replicas: 3\n",
//! ).unwrap();
//!
//! let session = Session::new("beta", settings);
//! let out = session.render_str("replicas: '#{deployment.replicas}'").unwrap();
//! assert_eq!(out, "---\nreplicas: '3'\n");
//! ```

pub mod error;
pub mod secrets;
pub mod subst;
pub mod transform;
pub mod value;

mod session;

pub use error::{Error, ErrorKind, Result};
pub use secrets::{ImportDirective, SecretDescriptor, SecretKeyRef, ValueFrom};
pub use session::{parse_documents, CommandRunner, Session, SessionOptions, DEFAULT_ENVIRONMENT};
pub use value::Value;
