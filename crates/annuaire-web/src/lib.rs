//! Browser front end for a [`Directory`].
//!
//! One directory lives for the lifetime of the server, starts empty and is
//! shared by every request behind a single mutex. Nothing is loaded or saved
//! automatically; the export and import forms are the only file access.

mod handlers;
mod page;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use annuaire_core::Directory;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, info};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_EXPORT_DIR: &str = "temp";

/// Largest accepted request body, which bounds import uploads.
const MAX_UPLOAD_BYTES: usize = 10 << 20;

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind: SocketAddr,
    /// Where exported files wait until they are downloaded.
    pub export_dir: PathBuf,
}

pub type SharedDirectory = Arc<Mutex<Directory>>;

#[derive(Clone)]
pub struct AppState {
    pub directory: SharedDirectory,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(directory: Directory, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            directory: Arc::new(Mutex::new(directory)),
            export_dir: export_dir.into(),
        }
    }

    /// Lock the directory, turning a poisoned lock into a 500 response.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Directory>, Response> {
        self.directory.lock().map_err(|_| {
            error!("directory lock poisoned");
            (StatusCode::INTERNAL_SERVER_ERROR, "directory lock poisoned").into_response()
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/add", post(handlers::add))
        .route("/search", get(handlers::search))
        .route("/delete", post(handlers::delete))
        .route("/export", post(handlers::export))
        .route("/download/:filename", get(handlers::download))
        .route("/import", post(handlers::import))
        .route("/clear", post(handlers::clear))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Serve the web interface until the process is stopped.
pub async fn serve(config: WebConfig) -> std::io::Result<()> {
    let state = AppState::new(Directory::new(), config.export_dir.clone());
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        export_dir = %config.export_dir.display(),
        "annuaire web interface listening"
    );
    println!("Server started on http://{}", config.bind);
    axum::serve(listener, router(state)).await
}
