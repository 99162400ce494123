use std::io::Write;

use annuaire_core::Directory;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::page::{self, Flash, MessageKind, Page};
use crate::AppState;

type HandlerResult = Result<Response, Response>;

const DEFAULT_EXPORT_NAME: &str = "contacts_export.json";
const DEFAULT_UPLOAD_NAME: &str = "upload.json";

// --- Request types ---

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HomeQuery {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    download: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    first: String,
    #[serde(default)]
    phone: String,
}

/// `name` doubles as the generic search term on `/search`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NameForm {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportForm {
    #[serde(default)]
    filename: String,
}

// --- Helpers ---

fn redirect_with(message: &str, kind: MessageKind) -> Response {
    let url = format!(
        "/?message={}&type={}",
        urlencoding::encode(message),
        kind.as_str()
    );
    Redirect::to(&url).into_response()
}

/// Snapshot for rendering, contacts in display order.
fn page_from(dir: &Directory) -> Page {
    let mut contacts = dir.list_contacts();
    contacts.sort();
    Page {
        count: dir.contact_count(),
        contacts,
        ..Page::default()
    }
}

/// Export names become a path segment and a URL segment, so only plain
/// file names are accepted.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

// --- Handlers ---

pub(crate) async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> HandlerResult {
    let mut page = page_from(&*state.lock()?);
    if let Some(text) = query.message.filter(|m| !m.is_empty()) {
        page.flash = Some(Flash {
            text,
            kind: MessageKind::parse(query.kind.as_deref()),
            download: query.download.filter(|d| is_plain_file_name(d)),
        });
    }
    Ok(Html(page::render(&page)).into_response())
}

pub(crate) async fn add(State(state): State<AppState>, Form(form): Form<AddForm>) -> HandlerResult {
    let result = state.lock()?.add_contact(&form.name, &form.first, &form.phone);
    Ok(match result {
        Ok(()) => {
            info!(name = %form.name, first = %form.first, "contact added");
            redirect_with(
                &format!("Contact {} {} added successfully to local memory", form.first, form.name),
                MessageKind::Success,
            )
        }
        Err(e) => {
            warn!(error = %e, "add rejected");
            redirect_with(&format!("Error: {e}"), MessageKind::Error)
        }
    })
}

pub(crate) async fn search(
    State(state): State<AppState>,
    Query(query): Query<NameForm>,
) -> HandlerResult {
    let term = query.name;
    let (mut page, results) = {
        let dir = state.lock()?;
        debug!(term = %term, total = dir.contact_count(), "search requested");
        let results = if term.is_empty() {
            None
        } else {
            Some(dir.filter_contacts(&term))
        };
        (page_from(&dir), results)
    };

    if let Some(mut results) = results {
        debug!(term = %term, found = results.len(), "search completed");
        results.sort();
        let (text, kind) = match results.len() {
            0 => (format!("No contact found matching: {term}"), MessageKind::Error),
            1 => ("Contact found".to_string(), MessageKind::Success),
            n => (format!("{n} contacts found"), MessageKind::Success),
        };
        page.flash = Some(Flash {
            text,
            kind,
            download: None,
        });
        page.search_results = Some(results);
    }
    Ok(Html(page::render(&page)).into_response())
}

pub(crate) async fn delete(State(state): State<AppState>, Form(form): Form<NameForm>) -> HandlerResult {
    let result = state.lock()?.delete_contact(&form.name);
    Ok(match result {
        Ok(()) => {
            info!(name = %form.name, "contact deleted");
            redirect_with(
                &format!("Contact {} deleted successfully from local memory", form.name),
                MessageKind::Success,
            )
        }
        Err(e) => {
            warn!(error = %e, "delete rejected");
            redirect_with(&format!("Error: {e}"), MessageKind::Error)
        }
    })
}

pub(crate) async fn export(State(state): State<AppState>, Form(form): Form<ExportForm>) -> HandlerResult {
    let filename = if form.filename.is_empty() {
        DEFAULT_EXPORT_NAME.to_string()
    } else {
        form.filename
    };
    if !is_plain_file_name(&filename) {
        return Ok(redirect_with(
            &format!("Export error: invalid file name '{filename}'"),
            MessageKind::Error,
        ));
    }

    let path = state.export_dir.join(&filename);
    let result = state.lock()?.export_to_json(&path);
    Ok(match result {
        Ok(()) => {
            info!(path = %path.display(), "contacts exported");
            let url = format!(
                "/?message={}&type=success&download={}",
                urlencoding::encode("Export successful!"),
                urlencoding::encode(&filename)
            );
            Redirect::to(&url).into_response()
        }
        Err(e) => {
            warn!(error = %e, "export failed");
            redirect_with(&format!("Export error: {e}"), MessageKind::Error)
        }
    })
}

/// Serve an exported file once, then remove it.
pub(crate) async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    if !is_plain_file_name(&filename) {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }
    let path = state.export_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "reading export failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error opening file").into_response();
        }
    };
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(path = %path.display(), error = %e, "removing served export failed");
    }

    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

pub(crate) async fn import(State(state): State<AppState>, mut multipart: Multipart) -> HandlerResult {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Ok(redirect_with(&format!("Form parsing error: {e}"), MessageKind::Error));
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_NAME)
            .to_string();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return Ok(redirect_with(&format!("File retrieval error: {e}"), MessageKind::Error));
            }
        };
        return import_upload(&state, &filename, &data);
    }
    Ok(redirect_with("File retrieval error: no file uploaded", MessageKind::Error))
}

/// Stage an uploaded file on disk and load it, replacing the directory.
pub(crate) fn import_upload(state: &AppState, filename: &str, data: &[u8]) -> HandlerResult {
    let staged = tempfile::NamedTempFile::new().and_then(|mut file| {
        file.write_all(data)?;
        file.flush()?;
        Ok(file)
    });
    let staged = match staged {
        Ok(file) => file,
        Err(e) => {
            warn!(error = %e, "staging upload failed");
            return Ok(redirect_with(
                &format!("Temporary file creation error: {e}"),
                MessageKind::Error,
            ));
        }
    };

    let outcome = {
        let mut dir = state.lock()?;
        dir.import_from_json(staged.path()).map(|()| dir.contact_count())
    };
    Ok(match outcome {
        Ok(count) => {
            info!(filename, count, "contacts imported");
            redirect_with(
                &format!("Data imported successfully from {filename} ({count} contacts loaded)"),
                MessageKind::Success,
            )
        }
        Err(e) => {
            warn!(filename, error = %e, "import failed");
            redirect_with(&format!("Import error from {filename}: {e}"), MessageKind::Error)
        }
    })
}

pub(crate) async fn clear(State(state): State<AppState>) -> HandlerResult {
    state.lock()?.clear();
    info!("directory cleared");
    Ok(redirect_with("Local memory cleared successfully", MessageKind::Success))
}
