//! HTTP request type.

use std::collections::HashMap;

use crate::params::{self, Slot};

/// An HTTP request.
///
/// The method is carried as a plain string and compared case-sensitively
/// during dispatch, so non-standard verbs route like any other. The path is
/// stored exactly as received; handlers and middleware see it untouched.
/// The transport hands over a bare path: query strings are its concern and
/// must be split off before the request reaches the router.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method, e.g. `"GET"`.
    pub method: String,
    /// Request path as received.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Captures the wildcard segments of this request's path into `slots`.
    ///
    /// `pattern` is the route pattern the request matched, with one `*` per
    /// capture. Returns `false` if the path diverges from the pattern or a
    /// captured segment fails to decode; slots filled before the divergence
    /// keep their new values. See [`params::extract`] for the full contract.
    ///
    /// # Panics
    ///
    /// Panics if the number of slots does not match the number of `*`
    /// wildcards in `pattern`.
    pub fn extract(&self, pattern: &str, slots: &mut [Slot<'_>]) -> bool {
        params::extract(&self.path, pattern, slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = Request::get("/users").header("Content-Type", "application/json");

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/users");
        assert_eq!(req.get_header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_path_is_carried_verbatim() {
        // The router never parses the path; a transport that forgets to
        // split off the query string routes the whole thing literally.
        let req = Request::get("/caf%C3%A9?page=1");
        assert_eq!(req.path, "/caf%C3%A9?page=1");
    }

    #[test]
    fn test_custom_verbs_are_preserved() {
        let req = Request::new("PURGE", "/cache/entry");
        assert_eq!(req.method, "PURGE");

        // No case folding: the dispatcher treats these as distinct verbs.
        assert_ne!(Request::new("get", "/").method, Request::get("/").method);
    }

    #[test]
    fn test_body_helpers() {
        let req = Request::post("/items").body(r#"{"id":7}"#);
        assert_eq!(req.body_string().as_deref(), Some(r#"{"id":7}"#));

        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_extract_captures_wildcard_segments() {
        let req = Request::get("/users/42/posts");
        let mut id = 0i64;
        assert!(req.extract("/users/*/posts", &mut [Slot::I64(&mut id)]));
        assert_eq!(id, 42);
    }
}
