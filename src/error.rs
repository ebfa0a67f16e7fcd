//! Error taxonomy for g.
//!
//! Per-path errors ([ListError::PathNotFound], [ListError::PermissionDenied], [ListError::Io])
//! are collected during a listing pass and reported once the output is flushed.
//! [ListError::NotARepository] and [ListError::UnsupportedLayoutWidth] never surface to the
//! user as failures, they are logged and the pipeline degrades.
//! [ListError::MalformedTheme] and [ListError::UnsupportedShell] are fatal at startup.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("cannot access '{}': No such file or directory", path.display())]
    PathNotFound { path: PathBuf },

    #[error("cannot open '{}': Permission denied", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not inside a git repository", path.display())]
    NotARepository { path: PathBuf },

    #[error("malformed theme '{}': {reason}", path.display())]
    MalformedTheme { path: PathBuf, reason: String },

    #[error("entry of width {needed} does not fit a {width} column terminal")]
    UnsupportedLayoutWidth { width: usize, needed: usize },

    #[error("unsupported shell '{0}', expected one of bash, zsh, fish, powershell, nushell")]
    UnsupportedShell(String),

    #[error("invalid glob '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ListError {
    /// Maps an io error for `path` onto the taxonomy.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ListError::PathNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => ListError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ListError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_taxonomy() {
        let p = Path::new("/nope");
        let not_found = ListError::from_io(p, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, ListError::PathNotFound { .. }));

        let denied = ListError::from_io(p, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, ListError::PermissionDenied { .. }));

        let other = ListError::from_io(p, io::Error::other("boom"));
        assert!(matches!(other, ListError::Io { .. }));
    }

    #[test]
    fn messages_name_the_path() {
        let err = ListError::PathNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert!(err.to_string().contains("missing.txt"));
    }
}
