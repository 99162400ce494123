//! HTML rendering for the single-page interface.

use std::fmt::Write;

use annuaire_core::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }

    /// Anything other than `error` is shown as a success message.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("error") => MessageKind::Error,
            _ => MessageKind::Success,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Flash {
    pub text: String,
    pub kind: MessageKind,
    /// Exported file ready at `/download/{name}`.
    pub download: Option<String>,
}

#[derive(Debug, Default)]
pub struct Page {
    pub count: usize,
    pub contacts: Vec<Contact>,
    pub search_results: Option<Vec<Contact>>,
    pub flash: Option<Flash>,
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn initials(contact: &Contact) -> String {
    contact
        .first
        .chars()
        .take(1)
        .chain(contact.name.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

fn push_contact_card(out: &mut String, contact: &Contact) {
    let _ = write!(
        out,
        r#"<div class="contact-card">
  <div class="contact-info">
    <div class="contact-avatar">{initials}</div>
    <div class="contact-details"><h3>{first} {name}</h3><p>{phone}</p></div>
  </div>
  <form action="/delete" method="POST">
    <input type="hidden" name="name" value="{name}">
    <button type="submit" class="btn btn-danger btn-small" onclick="return confirm('Delete this contact?')">Delete</button>
  </form>
</div>
"#,
        initials = escape(&initials(contact)),
        first = escape(&contact.first),
        name = escape(&contact.name),
        phone = escape(&contact.phone),
    );
}

pub fn render(page: &Page) -> String {
    let mut out = String::from(PAGE_HEAD);

    let _ = write!(
        out,
        r#"<div class="stats-card"><div class="stats-number">{}</div><div>contacts in memory</div></div>
"#,
        page.count
    );

    if let Some(flash) = &page.flash {
        let _ = write!(
            out,
            r#"<div class="message {}">{}"#,
            flash.kind.as_str(),
            escape(&flash.text)
        );
        if let Some(file) = &flash.download {
            let file = escape(file);
            let _ = write!(
                out,
                r#" <a href="/download/{file}" class="download-btn">Download {file}</a>"#
            );
        }
        out.push_str("</div>\n");
    }

    out.push_str(FORMS);

    if let Some(results) = page.search_results.as_ref().filter(|r| !r.is_empty()) {
        let _ = write!(
            out,
            r#"<div class="search-results"><h3>Search Results ({} found)</h3>
"#,
            results.len()
        );
        for contact in results {
            push_contact_card(&mut out, contact);
        }
        out.push_str("</div>\n");
    }

    out.push_str(r#"<div class="section-card contacts-grid"><h2 class="section-title">Contact List</h2>
"#);
    if page.contacts.is_empty() {
        out.push_str(r#"<div class="no-contacts"><p>No contacts in directory</p><p>Start by adding your first contact!</p></div>
"#);
    } else {
        for contact in &page.contacts {
            push_contact_card(&mut out, contact);
        }
    }
    out.push_str("</div>\n");

    out.push_str(FILE_MANAGEMENT);
    out.push_str(PAGE_FOOT);
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Annuaire - Web Interface</title>
<style>
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; padding: 20px; }
.container { max-width: 1200px; margin: 0 auto; background: rgba(255, 255, 255, 0.95); border-radius: 20px; overflow: hidden; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }
.header h1 { font-size: 2.5rem; font-weight: 300; margin-bottom: 10px; }
.stats-card { background: linear-gradient(135deg, #ff6b6b 0%, #ee5a52 100%); color: white; margin: 20px; padding: 20px; border-radius: 15px; text-align: center; }
.stats-number { font-size: 2.5rem; font-weight: bold; }
.main-content { padding: 30px; display: grid; grid-template-columns: 1fr 1fr; gap: 30px; }
.section-card { background: white; border-radius: 15px; padding: 25px; margin: 20px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.08); }
.section-title { font-size: 1.4rem; font-weight: 600; color: #333; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 2px solid #f0f0f0; }
input[type="text"], input[type="file"] { width: 100%; padding: 12px; border: 2px solid #e0e0e0; border-radius: 10px; font-size: 1rem; margin-bottom: 15px; }
.btn { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border: none; padding: 12px 25px; border-radius: 10px; font-size: 1rem; font-weight: 600; cursor: pointer; }
.btn-success { background: linear-gradient(135deg, #4ecdc4 0%, #44a08d 100%); }
.btn-danger { background: linear-gradient(135deg, #ff6b6b 0%, #ee5a52 100%); }
.btn-small { padding: 8px 15px; font-size: 0.9rem; }
.message { padding: 15px 20px; border-radius: 10px; margin: 20px; }
.message.success { background: #d4edda; color: #155724; border-left: 4px solid #28a745; }
.message.error { background: #f8d7da; color: #721c24; border-left: 4px solid #dc3545; }
.contact-card { background: #f8f9fa; border-radius: 10px; padding: 20px; margin-bottom: 15px; display: flex; justify-content: space-between; align-items: center; border-left: 4px solid #667eea; }
.contact-info { display: flex; align-items: center; gap: 15px; }
.contact-avatar { width: 50px; height: 50px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); border-radius: 50%; display: flex; align-items: center; justify-content: center; color: white; font-weight: bold; }
.search-results { background: #fff3cd; border: 2px solid #ffc107; border-radius: 10px; padding: 20px; margin: 20px; }
.file-actions { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; }
.no-contacts { text-align: center; padding: 40px; color: #666; }
@media (max-width: 768px) { .main-content { grid-template-columns: 1fr; } }
</style>
</head>
<body>
<div class="container">
<div class="header"><h1>Annuaire</h1><p class="subtitle">Contact directory - local memory</p></div>
"#;

const FORMS: &str = r#"<div class="main-content">
<div class="section-card">
  <h2 class="section-title">Add Contact</h2>
  <form action="/add" method="POST">
    <input type="text" name="name" placeholder="Last name" required>
    <input type="text" name="first" placeholder="First name" required>
    <input type="text" name="phone" placeholder="Phone number" required>
    <button type="submit" class="btn">Add Contact</button>
  </form>
</div>
<div class="section-card">
  <h2 class="section-title">Search Contact</h2>
  <form action="/search" method="GET">
    <input type="text" name="name" placeholder="Search by name, first name, or phone number" required>
    <button type="submit" class="btn">Search</button>
  </form>
</div>
</div>
"#;

const FILE_MANAGEMENT: &str = r#"<div class="section-card">
<h2 class="section-title">File Management</h2>
<div class="file-actions">
  <form action="/export" method="POST">
    <h3>Export Contacts</h3>
    <input type="text" name="filename" placeholder="File name" value="contacts_export.json" required>
    <button type="submit" class="btn btn-success">Prepare Download</button>
  </form>
  <form action="/import" method="POST" enctype="multipart/form-data">
    <h3>Import Contacts</h3>
    <input type="file" name="file" accept=".json" required>
    <button type="submit" class="btn btn-success">Import File</button>
  </form>
  <form action="/clear" method="POST">
    <h3>Clear Memory</h3>
    <button type="submit" class="btn btn-danger" onclick="return confirm('Clear local memory?')">Clear Memory</button>
  </form>
</div>
</div>
"#;

const PAGE_FOOT: &str = "</div>\n</body>\n</html>\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_html_specials() {
        assert_eq!(escape(r#"<a href="x">O'Neil & co</a>"#), "&lt;a href=&quot;x&quot;&gt;O&#39;Neil &amp; co&lt;/a&gt;");
    }

    #[test]
    fn initials_are_uppercased() {
        assert_eq!(initials(&Contact::new("dupont", "jean", "1")), "JD");
        assert_eq!(initials(&Contact::new("Élise", "ávila", "1")), "ÁÉ");
    }

    #[test]
    fn empty_page_shows_placeholder() {
        let html = render(&Page::default());
        assert!(html.contains("No contacts in directory"));
        assert!(!html.contains("Search Results"));
    }

    #[test]
    fn flash_with_download_renders_link() {
        let html = render(&Page {
            flash: Some(Flash {
                text: "Export successful!".to_string(),
                kind: MessageKind::Success,
                download: Some("contacts_export.json".to_string()),
            }),
            ..Page::default()
        });
        assert!(html.contains(r#"<div class="message success">Export successful!"#));
        assert!(html.contains(r#"href="/download/contacts_export.json""#));
    }

    #[test]
    fn message_kind_defaults_to_success() {
        assert_eq!(MessageKind::parse(None), MessageKind::Success);
        assert_eq!(MessageKind::parse(Some("info")), MessageKind::Success);
        assert_eq!(MessageKind::parse(Some("error")), MessageKind::Error);
    }
}
