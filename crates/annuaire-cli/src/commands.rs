//! One function per CLI action. Output goes to the given writer so the
//! actions can be exercised without a terminal.

use std::fs;
use std::io::Write;
use std::path::Path;

use annuaire_core::Directory;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Load the data file, starting empty when it does not exist yet.
///
/// The data file's directory is created up front. A file that exists but
/// cannot be read or parsed is reported and ignored.
pub fn load_directory(data_file: &Path) -> Result<Directory> {
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }

    let mut dir = Directory::new();
    match dir.import_from_json(data_file) {
        Ok(()) => debug!(path = %data_file.display(), count = dir.contact_count(), "contacts loaded"),
        Err(e) if e.is_not_found() => debug!(path = %data_file.display(), "no data file yet"),
        Err(e) => {
            warn!(error = %e, "loading contacts failed");
            eprintln!("Warning: error loading contacts: {e}");
        }
    }
    Ok(dir)
}

/// Save after a successful mutation. A failure is reported but does not
/// fail the action.
fn persist(dir: &Directory, data_file: &Path) {
    if let Err(e) = dir.export_to_json(data_file) {
        warn!(error = %e, "saving contacts failed");
        eprintln!("Warning: error saving: {e}");
    }
}

pub fn add(
    dir: &mut Directory,
    data_file: &Path,
    name: &str,
    first: &str,
    phone: &str,
    out: &mut impl Write,
) -> Result<()> {
    dir.add_contact(name, first, phone)?;
    info!(name, first, "contact added");
    persist(dir, data_file);
    writeln!(out, "Contact {first} {name} added successfully")?;
    Ok(())
}

pub fn list(dir: &Directory, out: &mut impl Write) -> Result<()> {
    let mut contacts = dir.list_contacts();
    if contacts.is_empty() {
        writeln!(out, "No contacts found")?;
        return Ok(());
    }
    contacts.sort();
    writeln!(out, "Contact list ({} total):", contacts.len())?;
    for c in &contacts {
        writeln!(out, "- {} {}: {}", c.first, c.name, c.phone)?;
    }
    Ok(())
}

/// A miss is reported, not treated as an error.
pub fn search(dir: &Directory, term: &str, out: &mut impl Write) -> Result<()> {
    match dir.search_contact(term) {
        Some(contact) => writeln!(out, "Contact found: {contact}")?,
        None => writeln!(out, "No contact found matching: {term}")?,
    }
    Ok(())
}

pub fn delete(dir: &mut Directory, data_file: &Path, name: &str, out: &mut impl Write) -> Result<()> {
    dir.delete_contact(name)?;
    info!(name, "contact deleted");
    persist(dir, data_file);
    writeln!(out, "Contact {name} deleted successfully")?;
    Ok(())
}

pub fn update(
    dir: &mut Directory,
    data_file: &Path,
    name: &str,
    first: &str,
    phone: &str,
    out: &mut impl Write,
) -> Result<()> {
    dir.update_contact(name, first, phone)?;
    info!(name, "contact updated");
    persist(dir, data_file);
    writeln!(out, "Contact {name} updated successfully")?;
    Ok(())
}

pub fn export(dir: &Directory, file: &Path, out: &mut impl Write) -> Result<()> {
    dir.export_to_json(file).context("export failed")?;
    writeln!(out, "Contacts exported to {}", file.display())?;
    Ok(())
}

/// Replace the directory with `file` and make it the new data file content.
pub fn import(dir: &mut Directory, data_file: &Path, file: &Path, out: &mut impl Write) -> Result<()> {
    dir.import_from_json(file).context("import failed")?;
    info!(path = %file.display(), count = dir.contact_count(), "contacts imported");
    persist(dir, data_file);
    writeln!(out, "Contacts imported from {}", file.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annuaire_core::{Contact, DirectoryError};
    use tempfile::TempDir;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn reload(data_file: &Path) -> Vec<Contact> {
        let mut contacts = load_directory(data_file).unwrap().list_contacts();
        contacts.sort();
        contacts
    }

    #[test]
    fn load_creates_data_dir_and_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("data").join("contacts.json");
        let dir = load_directory(&data_file).unwrap();
        assert_eq!(dir.contact_count(), 0);
        assert!(tmp.path().join("data").is_dir());
    }

    #[test]
    fn load_ignores_corrupt_data_file() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("contacts.json");
        fs::write(&data_file, "garbage").unwrap();
        let dir = load_directory(&data_file).unwrap();
        assert_eq!(dir.contact_count(), 0);
    }

    #[test]
    fn add_persists_between_sessions() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("contacts.json");
        let mut dir = load_directory(&data_file).unwrap();
        let mut out = Vec::new();
        add(&mut dir, &data_file, "Dupont", "Jean", "0123456789", &mut out).unwrap();
        assert_eq!(output(out), "Contact Jean Dupont added successfully\n");
        assert_eq!(reload(&data_file), vec![Contact::new("Dupont", "Jean", "0123456789")]);
    }

    #[test]
    fn add_duplicate_fails_with_core_error() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("contacts.json");
        let mut dir = Directory::new();
        add(&mut dir, &data_file, "Dupont", "Jean", "1", &mut Vec::new()).unwrap();
        let err = add(&mut dir, &data_file, "Dupont", "Jean", "1", &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirectoryError>(),
            Some(DirectoryError::Duplicate { .. })
        ));
    }

    #[test]
    fn list_output() {
        let mut out = Vec::new();
        list(&Directory::new(), &mut out).unwrap();
        assert_eq!(output(out), "No contacts found\n");

        let mut dir = Directory::new();
        dir.add_contact("Martin", "Alice", "0611223344").unwrap();
        dir.add_contact("Dupont", "Jean", "0123456789").unwrap();
        let mut out = Vec::new();
        list(&dir, &mut out).unwrap();
        assert_eq!(
            output(out),
            "Contact list (2 total):\n- Jean Dupont: 0123456789\n- Alice Martin: 0611223344\n"
        );
    }

    #[test]
    fn search_output() {
        let mut dir = Directory::new();
        dir.add_contact("Martin", "Alice", "0611223344").unwrap();
        let mut out = Vec::new();
        search(&dir, "Alice", &mut out).unwrap();
        search(&dir, "Bob", &mut out).unwrap();
        assert_eq!(
            output(out),
            "Contact found: Alice Martin - 0611223344\nNo contact found matching: Bob\n"
        );
    }

    #[test]
    fn update_and_delete_persist() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("contacts.json");
        let mut dir = Directory::new();
        add(&mut dir, &data_file, "Dupont", "Jean", "1", &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        update(&mut dir, &data_file, "Dupont", "", "2", &mut out).unwrap();
        assert_eq!(output(out), "Contact Dupont updated successfully\n");
        assert_eq!(reload(&data_file), vec![Contact::new("Dupont", "Jean", "2")]);

        let mut out = Vec::new();
        delete(&mut dir, &data_file, "Dupont", &mut out).unwrap();
        assert_eq!(output(out), "Contact Dupont deleted successfully\n");
        assert!(reload(&data_file).is_empty());

        assert!(delete(&mut dir, &data_file, "Dupont", &mut Vec::new()).is_err());
    }

    #[test]
    fn import_replaces_and_saves_to_data_file() {
        let tmp = TempDir::new().unwrap();
        let data_file = tmp.path().join("contacts.json");
        let source = tmp.path().join("source.json");
        let mut other = Directory::new();
        other.add_contact("Bernard", "Pierre", "11111").unwrap();
        let mut out = Vec::new();
        export(&other, &source, &mut out).unwrap();
        assert_eq!(output(out), format!("Contacts exported to {}\n", source.display()));

        let mut dir = Directory::new();
        dir.add_contact("Old", "Entry", "0").unwrap();
        import(&mut dir, &data_file, &source, &mut Vec::new()).unwrap();
        assert_eq!(reload(&data_file), vec![Contact::new("Bernard", "Pierre", "11111")]);
    }

    #[test]
    fn import_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut dir = Directory::new();
        let err = import(
            &mut dir,
            &tmp.path().join("contacts.json"),
            &tmp.path().join("missing.json"),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(err
            .downcast_ref::<DirectoryError>()
            .is_some_and(DirectoryError::is_not_found));
    }
}
