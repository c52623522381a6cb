//! Error types for rule loading and CRD patching

use std::path::{Path, PathBuf};

/// Errors raised while loading rules or patching CRD documents
#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema path '{path}': {reason}")]
    SchemaPath { path: String, reason: String },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{path:?}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<PatchError>,
    },
}

impl PatchError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn schema_path(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::SchemaPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the file a document-level error came from
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            // IO errors already name their path
            err @ Self::Io { .. } => err,
            err => Self::InFile {
                path: path.to_path_buf(),
                source: Box::new(err),
            },
        }
    }

    /// Whether this error stems from a schema tree mismatch
    pub fn is_schema_path(&self) -> bool {
        match self {
            Self::SchemaPath { .. } => true,
            Self::InFile { source, .. } => source.is_schema_path(),
            _ => false,
        }
    }

    /// Whether this error stems from a malformed rules specification
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Configuration(_) => true,
            Self::InFile { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PatchError>;
