//! Data preparation errors
//!
//! Every failure is fatal for the run. Variants name the offending path or
//! parameter so the log line alone is enough to fix the input tree.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the staging stages
pub type Result<T> = std::result::Result<T, DataPrepError>;

#[derive(Debug, Error)]
pub enum DataPrepError {
    /// A required input directory or file is absent, or a pattern matched nothing.
    #[error("no matching input file for '{pattern}' in {}", dir.display())]
    MissingInput { dir: PathBuf, pattern: String },

    #[error("scenario file not found: no file in {} contains '{scenario}'", dir.display())]
    ScenarioNotFound { dir: PathBuf, scenario: String },

    #[error("filesystem error while {action} {}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {} to {}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration for {name}: {message}")]
    InvalidConfiguration { name: String, message: String },

    #[error("geometry error in {}: {message}", path.display())]
    Geometry { path: PathBuf, message: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },
}

impl DataPrepError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataPrepError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn geometry(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DataPrepError::Geometry {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(name: impl Into<String>, message: impl Into<String>) -> Self {
        DataPrepError::InvalidConfiguration {
            name: name.into(),
            message: message.into(),
        }
    }

    /// True when the run failed because an input file was absent.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            DataPrepError::MissingInput { .. } | DataPrepError::ScenarioNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = DataPrepError::MissingInput {
            dir: PathBuf::from("/data/inputs/boundary"),
            pattern: "*.*".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/inputs/boundary"));
        assert!(msg.contains("*.*"));
        assert!(err.is_missing_input());

        let err = DataPrepError::config("SSP", "must not be empty");
        assert_eq!(err.to_string(), "invalid configuration for SSP: must not be empty");
        assert!(!err.is_missing_input());
    }

    #[test]
    fn test_filesystem_keeps_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DataPrepError::fs("creating", "/readonly/outputs", io);
        assert!(err.to_string().contains("creating /readonly/outputs"));
        assert!(err.source().is_some());
    }
}
