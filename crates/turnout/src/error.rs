//! Error types for the router crate.

use thiserror::Error;

/// Errors that can occur while resolving a request against the route table.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No registered route matched the request path and no fallback route
    /// was found on the way back up the tree.
    #[error("no route matched {method} {path}")]
    NotFound {
        /// Request method.
        method: String,
        /// Request path as received.
        path: String,
    },

    /// A node matched the path but holds no handler for the request method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// Request method.
        method: String,
        /// Request path as received.
        path: String,
    },
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
