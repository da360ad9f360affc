//! Error types for kubefold
//!
//! Structured errors with the config path involved, an underlying cause,
//! and an actionable help message. Every failure is fatal to the render
//! that raised it; there are no retry or recovery paths.

use std::fmt;

/// Result type alias for kubefold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kubefold operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Settings or document path involved (e.g., "deployment.replicas")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced dotted path does not resolve in the settings tree
    MissingVariable,
    /// Read/write failure on a template, secrets, or output path
    Io,
    /// Malformed YAML or malformed marker syntax
    Parse,
    /// A structural precondition on the input document was violated
    Precondition,
}

impl Error {
    /// Create a missing-variable error for a dotted settings path
    pub fn missing_variable(path: impl Into<String>) -> Self {
        let path_str = path.into();
        Self {
            kind: ErrorKind::MissingVariable,
            path: Some(path_str.clone()),
            help: Some(format!(
                "Check that '{}' exists in the settings tree for this environment",
                path_str
            )),
            cause: None,
        }
    }

    /// Create an I/O error for a file-system path
    pub fn io(file: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            path: Some(file.into()),
            help: None,
            cause: Some(cause.into()),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            path: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create a precondition-violation error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Precondition,
            path: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::MissingVariable => write!(f, "Missing variable")?,
            ErrorKind::Io => write!(f, "I/O error")?,
            ErrorKind::Parse => write!(f, "Parse error")?,
            ErrorKind::Precondition => write!(f, "Precondition violation")?,
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
