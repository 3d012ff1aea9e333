//! Route registration and request dispatch.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::middleware::{Handler, MiddlewareStack};
use crate::request::Request;
use crate::response::Response;
use crate::trie::{NodeId, SegmentTrie, ANY_METHOD, FALLBACK_SEGMENT};

/// The router: a verb-aware segment trie with middleware baked in at
/// registration time.
///
/// Patterns are plain paths whose segments may be the wildcard `"*"`
/// (matches any one segment, literals win over it) or the fallback marker
/// `"404"` (consulted for requests that match nothing below that point).
/// A pattern with and without a trailing slash addresses the same route.
///
/// Registration is a consuming builder; once built, the router is
/// immutable and [`handle`](Router::handle) takes `&self`, so a single
/// instance can serve concurrent requests behind an [`Arc`].
pub struct Router {
    trie: SegmentTrie,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self {
            trie: SegmentTrie::new(),
        }
    }

    /// Registers `handler` for `method` at `pattern`.
    ///
    /// The verb is matched case-sensitively and may be any string;
    /// [`ANY_METHOD`] registers a catch-all verb consulted after exact
    /// ones. Registering the same verb and pattern twice keeps the later
    /// handler.
    #[must_use]
    pub fn route<F, Fut>(self, method: impl Into<String>, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route_with(method, pattern, handler, &MiddlewareStack::new())
    }

    /// Registers `handler` for `method` at `pattern`, wrapped in
    /// `middleware`.
    ///
    /// The stack is composed here, once; dispatch later invokes the
    /// wrapped handler directly with no per-request assembly.
    #[must_use]
    pub fn route_with<F, Fut>(
        mut self,
        method: impl Into<String>,
        pattern: &str,
        handler: F,
        middleware: &MiddlewareStack,
    ) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let method = method.into();
        let base: Handler = Arc::new(move |req| Box::pin(handler(req)));
        let composed = middleware.compose(base);
        debug!(method = %method, pattern = %pattern, layers = middleware.len(), "route registered");
        let node = self.trie.insert(pattern);
        self.trie.set_handler(node, method, composed);
        self
    }

    /// Registers a GET route.
    #[must_use]
    pub fn get<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route("GET", pattern, handler)
    }

    /// Registers a GET route with middleware.
    #[must_use]
    pub fn get_with<F, Fut>(self, pattern: &str, handler: F, middleware: &MiddlewareStack) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route_with("GET", pattern, handler, middleware)
    }

    /// Registers a POST route.
    #[must_use]
    pub fn post<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route("POST", pattern, handler)
    }

    /// Registers a POST route with middleware.
    #[must_use]
    pub fn post_with<F, Fut>(self, pattern: &str, handler: F, middleware: &MiddlewareStack) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route_with("POST", pattern, handler, middleware)
    }

    /// Registers a PUT route.
    #[must_use]
    pub fn put<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route("PUT", pattern, handler)
    }

    /// Registers a DELETE route.
    #[must_use]
    pub fn delete<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route("DELETE", pattern, handler)
    }

    /// Registers the root fallback handler, reached by any verb whose
    /// request matches nothing else.
    ///
    /// Equivalent to registering `/404` by hand; deeper fallbacks are
    /// ordinary registrations like `/api/404`.
    #[must_use]
    pub fn not_found<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.not_found_with(handler, &MiddlewareStack::new())
    }

    /// Registers the root fallback handler with middleware.
    #[must_use]
    pub fn not_found_with<F, Fut>(self, handler: F, middleware: &MiddlewareStack) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let pattern = format!("/{FALLBACK_SEGMENT}");
        self.route_with(ANY_METHOD, &pattern, handler, middleware)
    }

    /// Handles a request, always producing a response.
    ///
    /// Resolution failures map to bare status responses: no node and no
    /// fallback is a 404, a node without the request's verb is a 405.
    /// Matched handlers receive the request untouched, trailing slash and
    /// all.
    pub async fn handle(&self, request: Request) -> Response {
        match self.resolve(&request.method, &request.path) {
            Ok(handler) => handler(request).await,
            Err(RouterError::NotFound { method, path }) => {
                debug!(method = %method, path = %path, "no route matched");
                Response::not_found()
            }
            Err(RouterError::MethodNotAllowed { method, path }) => {
                debug!(method = %method, path = %path, "method not allowed");
                Response::method_not_allowed()
            }
        }
    }

    /// Resolves a method and path to a registered handler.
    ///
    /// The path is walked down the trie; if it runs off the tree or stops
    /// on a node with no handlers, the nearest fallback node takes over.
    /// The chosen node then selects by verb, so a fallback route that only
    /// answers GET still yields `MethodNotAllowed` for other verbs.
    fn resolve(&self, method: &str, path: &str) -> Result<&Handler> {
        let descent = self.trie.descend(path);
        let node = if descent.matched && self.trie.has_handlers(descent.node) {
            descent.node
        } else {
            self.fallback_for(descent.node, method, path)?
        };
        self.trie
            .handler(node, method)
            .ok_or_else(|| RouterError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            })
    }

    fn fallback_for(&self, from: NodeId, method: &str, path: &str) -> Result<NodeId> {
        self.trie
            .fallback(from)
            .ok_or_else(|| RouterError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
    }
}
