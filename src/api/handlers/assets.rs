//! Static files for the login page.

use axum::{
    extract::Extension,
    http::{Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, error};

const INDEX_FILE: &str = "index.html";

/// Directory that non-API `GET` requests are served from.
#[derive(Clone, Debug)]
pub struct PublicDir(PathBuf);

impl PublicDir {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Map a request path to a file inside the directory.
    ///
    /// Returns `None` for anything that is not a plain relative path, so
    /// `..` and absolute segments can never leave the directory.
    #[must_use]
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        let relative = if relative.is_empty() {
            INDEX_FILE
        } else {
            relative
        };

        let mut path = self.0.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(path)
    }
}

fn content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn plain(status: StatusCode, text: &'static str) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], text).into_response()
}

/// Router fallback: serve `GET` requests from the public directory and
/// reject every other method.
pub async fn serve(method: Method, uri: Uri, public: Extension<Arc<PublicDir>>) -> Response {
    if method != Method::GET {
        return plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    }

    let Some(path) = public.resolve(uri.path()) else {
        debug!("rejected path: {}", uri.path());
        return plain(StatusCode::NOT_FOUND, "404 Not Found");
    };

    match tokio::fs::read(&path).await {
        Ok(content) => (
            StatusCode::OK,
            [(CONTENT_TYPE, content_type(&path))],
            content,
        )
            .into_response(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("static file not found: {}", path.display());
            plain(StatusCode::NOT_FOUND, "404 Not Found")
        }
        Err(err) => {
            error!("Error reading {}: {}", path.display(), err);
            plain(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
        }
    }
}
