//! Middleware composed around handlers at registration time.

use std::sync::Arc;

use tracing::debug;

use crate::request::Request;
use crate::response::Response;

/// A boxed future for async handler results.
pub use futures::future::BoxFuture;

/// A boxed async handler function.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Trait for middleware wrapped around a handler when a route is registered.
///
/// A middleware runs once per route at registration time, not once per
/// request: it receives the handler beneath it and returns the handler that
/// takes its place. The returned handler decides per request whether to
/// rewrite the request, call through, short-circuit with its own response,
/// or decorate the response on the way out.
///
/// # Example
///
/// ```ignore
/// struct ServerHeader;
///
/// impl Middleware for ServerHeader {
///     fn wrap(&self, next: Handler) -> Handler {
///         Arc::new(move |req| {
///             let fut = next(req);
///             Box::pin(async move { fut.await.header("Server", "turnout") })
///         })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Wraps `next`, returning the handler the route will store.
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// An ordered collection of middleware applied together at registration.
///
/// The first middleware pushed becomes the outermost wrapper: on each
/// request its logic runs first on the way in and last on the way out.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware to the stack.
    pub fn push(&mut self, middleware: impl Middleware + 'static) {
        self.layers.push(Arc::new(middleware));
    }

    /// Appends a middleware, consuming and returning the stack.
    #[must_use]
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.push(middleware);
        self
    }

    /// Returns the number of middleware in the stack.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the stack holds no middleware.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wraps `handler` in every middleware of the stack.
    ///
    /// Wrapping proceeds from the last middleware to the first, so the
    /// first one pushed ends up outermost.
    #[must_use]
    pub fn compose(&self, handler: Handler) -> Handler {
        let mut handler = handler;
        for layer in self.layers.iter().rev() {
            handler = layer.wrap(handler);
        }
        handler
    }
}

/// Middleware that permanently redirects requests missing a trailing slash.
///
/// Register it on the slash-terminated form of a route so that clients
/// asking for `/dir` are sent to `/dir/` instead of being served a second
/// copy under a non-canonical URL.
pub struct RedirectToSlash;

impl Middleware for RedirectToSlash {
    fn wrap(&self, next: Handler) -> Handler {
        Arc::new(move |req: Request| {
            if req.path.ends_with('/') {
                next(req)
            } else {
                let location = format!("{}/", req.path);
                Box::pin(async move { Response::redirect_permanent(location) })
            }
        })
    }
}

/// Middleware that permanently redirects slash-terminated requests to the
/// form without the trailing slash.
pub struct RedirectFromSlash;

impl Middleware for RedirectFromSlash {
    fn wrap(&self, next: Handler) -> Handler {
        Arc::new(move |req: Request| {
            match req.path.strip_suffix('/') {
                Some(trimmed) => {
                    let location = trimmed.to_string();
                    Box::pin(async move { Response::redirect_permanent(location) })
                }
                None => next(req),
            }
        })
    }
}

/// Middleware that emits a debug log line for every request it sees.
pub struct RequestLog;

impl Middleware for RequestLog {
    fn wrap(&self, next: Handler) -> Handler {
        Arc::new(move |req: Request| {
            let method = req.method.clone();
            let path = req.path.clone();
            let fut = next(req);
            Box::pin(async move {
                let response = fut.await;
                debug!(method = %method, path = %path, status = response.status, "request handled");
                response
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn text_handler(body: &'static str) -> Handler {
        Arc::new(move |_req| Box::pin(async move { Response::text(body) }))
    }

    /// Records enter/exit markers so composition order is observable.
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn wrap(&self, next: Handler) -> Handler {
            let label = self.label;
            let log = self.log.clone();
            Arc::new(move |req: Request| {
                let log = log.clone();
                let next = next.clone();
                Box::pin(async move {
                    log.lock().unwrap().push(format!("{label} in"));
                    let response = next(req).await;
                    log.lock().unwrap().push(format!("{label} out"));
                    response
                })
            })
        }
    }

    #[tokio::test]
    async fn test_first_pushed_runs_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stack = MiddlewareStack::new()
            .with(Recorder {
                label: "outer",
                log: log.clone(),
            })
            .with(Recorder {
                label: "inner",
                log: log.clone(),
            });

        let inner_log = log.clone();
        let handler: Handler = Arc::new(move |_req| {
            let inner_log = inner_log.clone();
            Box::pin(async move {
                inner_log.lock().unwrap().push("handler".to_string());
                Response::ok()
            })
        });

        let composed = stack.compose(handler);
        composed(Request::get("/")).await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec!["outer in", "inner in", "handler", "inner out", "outer out"]
        );
    }

    #[tokio::test]
    async fn test_closure_middleware() {
        let stack = MiddlewareStack::new().with(|next: Handler| -> Handler {
            Arc::new(move |req: Request| {
                let fut = next(req);
                Box::pin(async move { fut.await.header("X-Traced", "1") })
            })
        });

        let composed = stack.compose(text_handler("ok"));
        let res = composed(Request::get("/")).await;
        assert_eq!(res.headers.get("X-Traced"), Some(&"1".to_string()));
        assert_eq!(res.body_string(), Some("ok".to_string()));
    }

    #[tokio::test]
    async fn test_empty_stack_is_identity() {
        let composed = MiddlewareStack::new().compose(text_handler("untouched"));
        let res = composed(Request::get("/")).await;
        assert_eq!(res.body_string(), Some("untouched".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_to_slash() {
        let handler = RedirectToSlash.wrap(text_handler("dir listing"));

        let res = handler(Request::get("/files")).await;
        assert_eq!(res.status, 301);
        assert_eq!(res.headers.get("Location"), Some(&"/files/".to_string()));

        let res = handler(Request::get("/files/")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("dir listing".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_from_slash() {
        let handler = RedirectFromSlash.wrap(text_handler("page"));

        let res = handler(Request::get("/about/")).await;
        assert_eq!(res.status, 301);
        assert_eq!(res.headers.get("Location"), Some(&"/about".to_string()));

        let res = handler(Request::get("/about")).await;
        assert_eq!(res.status, 200);
    }
}
