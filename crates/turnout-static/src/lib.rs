//! Static file mounts for turnout routers.
//!
//! [`mount`] walks a directory tree once, at configuration time, and
//! registers one GET route per file it finds. Files named `index.html`
//! are registered at their directory's route instead of their own name,
//! so `/docs/` serves `docs/index.html`. Files created after the mount
//! are never discovered; the route table is frozen like any other.
//!
//! Each request opens its file fresh and closes it on every exit path,
//! so a file deleted after mounting degrades to a logged 500 for that
//! route while the rest of the router keeps serving.
//!
//! ```ignore
//! use turnout::Router;
//!
//! let router = Router::new().get("/", home);
//! let router = turnout_static::mount(router, "/static", "./public")?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::io::AsyncReadExt;
use tracing::{debug, error};
use turnout::{MiddlewareStack, Request, Response, Router};

mod error;

pub use error::{MountError, Result};

/// File name served at its directory's route rather than its own.
const INDEX_FILE: &str = "index.html";

/// One discovered file and the route that will serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    /// Route path to register, e.g. `/static/css/site.css`.
    pub route: String,
    /// Filesystem path opened on each request.
    pub source: PathBuf,
}

/// Walks `dir` and returns the routes a mount would register, sorted by
/// route path.
///
/// `prefix` is prepended to every route; a trailing slash on it is
/// ignored, and an empty prefix mounts at the root. Directory entries are
/// recursed into; everything else becomes a servable entry.
///
/// # Errors
///
/// Fails on the first directory that cannot be read or entry that cannot
/// be inspected. Enumeration is all-or-nothing: a partial mount would
/// silently drop routes, which is exactly the kind of configuration
/// defect that should stop startup.
pub fn enumerate(prefix: &str, dir: impl AsRef<Path>) -> Result<Vec<MountEntry>> {
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let mut entries = Vec::new();
    walk(prefix, dir.as_ref(), &mut entries)?;
    entries.sort_by(|a, b| a.route.cmp(&b.route));
    Ok(entries)
}

fn walk(prefix: &str, dir: &Path, out: &mut Vec<MountEntry>) -> Result<()> {
    let listing = fs::read_dir(dir).map_err(|source| MountError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in listing {
        let entry = entry.map_err(|source| MountError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let kind = entry.file_type().map_err(|source| MountError::Inspect {
            path: path.clone(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if kind.is_dir() {
            walk(&format!("{prefix}/{name}"), &path, out)?;
        } else if name == INDEX_FILE {
            let route = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(MountEntry {
                route,
                source: path,
            });
        } else {
            out.push(MountEntry {
                route: format!("{prefix}/{name}"),
                source: path,
            });
        }
    }
    Ok(())
}

/// Mounts the files under `dir` onto `router` at `prefix`.
///
/// Equivalent to [`mount_with`] with an empty middleware stack.
///
/// # Errors
///
/// Returns the first enumeration failure; see [`enumerate`].
pub fn mount(router: Router, prefix: &str, dir: impl AsRef<Path>) -> Result<Router> {
    mount_with(router, prefix, dir, &MiddlewareStack::new())
}

/// Mounts the files under `dir` onto `router` at `prefix`, wrapping every
/// file route in `middleware`.
///
/// # Errors
///
/// Returns the first enumeration failure; see [`enumerate`].
pub fn mount_with(
    mut router: Router,
    prefix: &str,
    dir: impl AsRef<Path>,
    middleware: &MiddlewareStack,
) -> Result<Router> {
    let dir = dir.as_ref();
    let entries = enumerate(prefix, dir)?;
    debug!(prefix = %prefix, dir = %dir.display(), files = entries.len(), "mounting static files");

    for entry in entries {
        let source = entry.source;
        router = router.get_with(
            &entry.route,
            move |_req: Request| {
                let source = source.clone();
                async move { serve_file(&source).await }
            },
            middleware,
        );
    }
    Ok(router)
}

/// Serves one file for one request: open, stat, read, respond.
///
/// The handle lives only in this scope, so it is released on success and
/// on every failure path alike. Any IO failure is logged and answered
/// with a 500 for this request only.
async fn serve_file(source: &Path) -> Response {
    let mut file = match tokio::fs::File::open(source).await {
        Ok(file) => file,
        Err(err) => {
            error!(path = %source.display(), error = %err, "could not open mounted file");
            return Response::internal_server_error();
        }
    };

    let modified = match file.metadata().await {
        Ok(meta) => meta.modified().ok(),
        Err(err) => {
            error!(path = %source.display(), error = %err, "could not stat mounted file");
            return Response::internal_server_error();
        }
    };

    let mut body = Vec::new();
    if let Err(err) = file.read_to_end(&mut body).await {
        error!(path = %source.display(), error = %err, "could not read mounted file");
        return Response::internal_server_error();
    }

    let mut response = Response::ok()
        .header("Content-Type", content_type_for(source))
        .body(body);
    if let Some(modified) = modified {
        response = response.header("Last-Modified", http_date(modified));
    }
    response
}

/// Maps a file extension to a Content-Type header value.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") | Some("md") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Formats a modification time as an HTTP date (RFC 7231, always GMT).
fn http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
