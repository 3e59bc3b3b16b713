//! Typed errors for the context pipeline.
//!
//! Almost everything in the pipeline recovers locally (bad config fields,
//! unreadable subdirectories, failed parses); only the cases here surface
//! to the user as fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to read project root at {path}: {source}")]
    ProjectRootUnreadable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write context document at {path}: {source}")]
    OutputWriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_project_root_unreadable_carries_path() {
        let path = PathBuf::from("/missing/project");
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err = ContextError::ProjectRootUnreadable {
            path: path.clone(),
            source: io_err,
        };
        match &err {
            ContextError::ProjectRootUnreadable { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected ProjectRootUnreadable"),
        }
        assert!(err.to_string().contains("/missing/project"));
    }

    #[test]
    fn test_implements_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        let err = ContextError::OutputWriteFailed {
            path: PathBuf::from("/out.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_std_error(&err);
    }
}
