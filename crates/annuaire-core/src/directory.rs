use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::{Contact, ContactKey, DirectoryError, DirectoryResult};

/// In-memory contact store keyed by [`ContactKey`].
///
/// Iteration order is unspecified. Operations that pick "the first" matching
/// contact may pick any of several candidates.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    contacts: HashMap<ContactKey, Contact>,
}

/// Exact, case-sensitive match on last name, first name or phone.
fn is_match(contact: &Contact, term: &str) -> bool {
    contact.name == term || contact.first == term || contact.phone == term
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new contact. All three fields must be non-empty and no
    /// contact may already exist with the same last name and phone.
    pub fn add_contact(&mut self, name: &str, first: &str, phone: &str) -> DirectoryResult<()> {
        let missing: Vec<&str> = [("name", name), ("first", first), ("phone", phone)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(DirectoryError::Validation(missing.join(", ")));
        }

        match self.contacts.entry(ContactKey::new(name, phone)) {
            Entry::Occupied(_) => Err(DirectoryError::Duplicate {
                name: name.to_string(),
                phone: phone.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Contact::new(name, first, phone));
                Ok(())
            }
        }
    }

    /// First contact whose last name, first name or phone equals `term`.
    pub fn search_contact(&self, term: &str) -> Option<Contact> {
        self.contacts.values().find(|c| is_match(c, term)).cloned()
    }

    /// Every contact matching `term`, with the same predicate as
    /// [`Directory::search_contact`].
    pub fn filter_contacts(&self, term: &str) -> Vec<Contact> {
        self.contacts
            .values()
            .filter(|c| is_match(c, term))
            .cloned()
            .collect()
    }

    pub fn list_contacts(&self) -> Vec<Contact> {
        self.contacts.values().cloned().collect()
    }

    /// Update the first contact with last name `name`. Empty `new_first` or
    /// `new_phone` leave the field unchanged. The contact keeps its original
    /// key even when the phone changes.
    pub fn update_contact(&mut self, name: &str, new_first: &str, new_phone: &str) -> DirectoryResult<()> {
        let contact = self
            .contacts
            .values_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;
        if !new_first.is_empty() {
            contact.first = new_first.to_string();
        }
        if !new_phone.is_empty() {
            contact.phone = new_phone.to_string();
        }
        Ok(())
    }

    /// Remove one contact with last name `name`, even if several share it.
    pub fn delete_contact(&mut self, name: &str) -> DirectoryResult<()> {
        let key = self
            .contacts
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;
        self.contacts.remove(&key);
        Ok(())
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Replace the whole store, keying each contact by its current name and
    /// phone. On key collisions the later contact wins.
    pub(crate) fn replace_all(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts
            .into_iter()
            .map(|c| (ContactKey::of(&c), c))
            .collect();
    }
}
