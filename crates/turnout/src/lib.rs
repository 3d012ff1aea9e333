//! # turnout
//!
//! A segment-trie request router with wildcard matching, nearest-ancestor
//! not-found fallback and registration-time middleware.
//!
//! This crate provides:
//! - Trie-based path dispatch, one node per path segment
//! - Single-segment `*` wildcards, with literals taking priority
//! - Hierarchical `404` fallback routes, nearest ancestor first
//! - Arbitrary case-sensitive verbs plus a `*` any-method entry
//! - Middleware composed once at registration, not per request
//! - Typed extraction of wildcard segments into caller-owned slots
//!
//! ## Quick Start
//!
//! ```ignore
//! use turnout::{Request, Response, Router, Slot};
//!
//! async fn hello_handler(_req: Request) -> Response {
//!     Response::text("Hello, World!")
//! }
//!
//! async fn user_handler(req: Request) -> Response {
//!     let mut id = 0i64;
//!     if !req.extract("/users/*", &mut [Slot::I64(&mut id)]) {
//!         return Response::not_found();
//!     }
//!     Response::json(&serde_json::json!({ "id": id }))
//! }
//!
//! let router = Router::new()
//!     .get("/", hello_handler)
//!     .get("/users/*", user_handler);
//!
//! // Handle a request
//! let response = router.handle(Request::get("/users/123")).await;
//! ```
//!
//! ## Wildcards and fallback
//!
//! A `*` pattern segment matches exactly one request segment of any text;
//! an exact literal child always wins over it. A `404` pattern segment
//! marks a fallback route: requests that run off the tree, or land on a
//! node with no handlers, are served by the nearest fallback at or above
//! the point where matching stopped.
//!
//! ```ignore
//! let router = Router::new()
//!     .get("/api/users/*", get_user)
//!     .route("*", "/api/404", api_not_found)   // covers /api/...
//!     .not_found(site_not_found);              // covers everything else
//! ```
//!
//! ## Middleware
//!
//! Middleware wraps handlers when a route is registered, so the stack
//! costs nothing at dispatch time:
//!
//! ```ignore
//! use turnout::{MiddlewareStack, RedirectToSlash, RequestLog};
//!
//! let mw = MiddlewareStack::new().with(RequestLog).with(RedirectToSlash);
//! let router = Router::new().get_with("/docs/", serve_docs, &mw);
//! ```
//!
//! ## Extracting parameters
//!
//! Handlers pull typed values out of the matched path by re-walking it
//! against the pattern with one [`Slot`] per wildcard:
//!
//! ```ignore
//! let mut owner = String::new();
//! let mut repo_id = 0i32;
//! if req.extract("/repos/*/id/*", &mut [
//!     Slot::Text(&mut owner),
//!     Slot::I32(&mut repo_id),
//! ]) {
//!     // both slots are filled
//! }
//! ```

mod error;
mod middleware;
mod params;
mod request;
mod response;
mod router;
mod trie;

pub use error::{Result, RouterError};
pub use middleware::{
    BoxFuture, Handler, Middleware, MiddlewareStack, RedirectFromSlash, RedirectToSlash,
    RequestLog,
};
pub use params::{extract, Slot};
pub use request::Request;
pub use response::Response;
pub use router::Router;
pub use trie::{ANY_METHOD, FALLBACK_SEGMENT, WILDCARD_SEGMENT};
