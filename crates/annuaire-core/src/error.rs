//! Error taxonomy for directory operations and contact file I/O.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// One or more required fields were empty. Holds the field names.
    #[error("required fields missing: {0}")]
    Validation(String),

    /// A contact with the same last name and phone is already stored.
    #[error("contact {name} with phone {phone} already exists")]
    Duplicate { name: String, phone: String },

    /// No stored contact matched the lookup term.
    #[error("contact not found: {0}")]
    NotFound(String),

    /// The file to import does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The contact file is not a JSON array of contacts.
    #[error("invalid contact file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, source: serde_json::Error) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for a missing import file. Callers loading an optional data file
    /// use this to start from an empty directory.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DirectoryError::Validation("name, phone".to_string());
        assert_eq!(err.to_string(), "required fields missing: name, phone");

        let err = DirectoryError::Duplicate {
            name: "Dupont".to_string(),
            phone: "0123456789".to_string(),
        };
        assert_eq!(err.to_string(), "contact Dupont with phone 0123456789 already exists");

        let err = DirectoryError::NotFound("Durand".to_string());
        assert_eq!(err.to_string(), "contact not found: Durand");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DirectoryError::FileNotFound(PathBuf::from("missing.json")).is_not_found());
        assert!(!DirectoryError::NotFound("Durand".to_string()).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!DirectoryError::io(Path::new("x.json"), io).is_not_found());
    }
}
