//! JSON persistence for a [`Directory`].
//!
//! The file is a JSON array of `{"name", "first", "phone"}` objects. Keys are
//! never written; they are rebuilt from each contact on import.

use std::fs;
use std::io;
use std::path::Path;

use crate::{Contact, Directory, DirectoryError, DirectoryResult};

/// Data file used by the CLI when none is given.
pub const DEFAULT_DATA_FILE: &str = "data/contacts.json";

impl Directory {
    /// Write every contact to `path`, creating parent directories as needed.
    /// An existing file is overwritten.
    pub fn export_to_json(&self, path: impl AsRef<Path>) -> DirectoryResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.list_contacts())
            .map_err(|e| DirectoryError::format(path, e))?;
        write_atomic(path, &json)
    }

    /// Replace the whole store with the contacts in `path`.
    ///
    /// A missing file is [`DirectoryError::FileNotFound`]. On any error the
    /// store is left as it was.
    pub fn import_from_json(&mut self, path: impl AsRef<Path>) -> DirectoryResult<()> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DirectoryError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(DirectoryError::io(path, e)),
        };
        let contacts: Vec<Contact> =
            serde_json::from_str(&raw).map_err(|e| DirectoryError::format(path, e))?;
        self.replace_all(contacts);
        Ok(())
    }
}

/// Temp file + rename so a reader never sees a half-written file.
fn write_atomic(path: &Path, data: &str) -> DirectoryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DirectoryError::io(dir, e))?;

    let file_name = path.file_name().ok_or_else(|| {
        DirectoryError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let tmp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));
    fs::write(&tmp, data).map_err(|e| DirectoryError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| DirectoryError::io(path, e))
}
