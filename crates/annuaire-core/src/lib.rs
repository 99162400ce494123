pub mod directory;
pub mod error;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use directory::Directory;
pub use error::{DirectoryError, DirectoryResult};
pub use storage::DEFAULT_DATA_FILE;

// --- Types ---

/// A single directory entry.
///
/// Ordering is by last name, then first name, then phone, which is what the
/// CLI and web page use for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Contact {
    /// Last name
    pub name: String,
    /// First name
    pub first: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, first: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first: first.into(),
            phone: phone.into(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.first, self.name, self.phone)
    }
}

const KEY_SEPARATOR: char = '_';

/// Storage slot of a contact: last name and phone joined by `_`.
///
/// The key is fixed when the contact is created. Updating a contact's phone
/// leaves it under the key it was added with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactKey(String);

impl ContactKey {
    pub fn new(name: &str, phone: &str) -> Self {
        Self(format!("{name}{KEY_SEPARATOR}{phone}"))
    }

    /// Key implied by the contact's current name and phone.
    pub fn of(contact: &Contact) -> Self {
        Self::new(&contact.name, &contact.phone)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
