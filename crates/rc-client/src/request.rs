//! Request assembly: default JSON headers, caller headers and JSON bodies.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind, Result};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry the request data as a JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call request data and headers.
///
/// A send operation takes an immutable reference, so nothing can change the
/// options while a retried call is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub(crate) data: BTreeMap<String, String>,
    pub(crate) headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Empty options: no request data, no custom headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request-data field. Replaces an existing value for `key`.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_data(key, value);
        self
    }

    /// Replace all request data.
    pub fn with_data<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.replace_data(data);
        self
    }

    /// Add a custom header. Replaces an existing value for the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Add several custom headers.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.insert_header(name, value);
        }
        self
    }

    /// Request data that POST and PUT send as a JSON object.
    pub fn request_data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Custom headers applied after the defaults.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub(crate) fn insert_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub(crate) fn replace_data<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.data = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    pub(crate) fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }
}

/// A fully assembled request, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: RequestMethod,
    pub endpoint: String,
    /// Headers in application order. Names are unique (case-sensitive).
    pub headers: Vec<(String, String)>,
    /// JSON body for POST and PUT.
    pub body: Option<serde_json::Value>,
}

impl PreparedRequest {
    /// Value of a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Builds requests for one method and endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: RequestMethod,
    endpoint: String,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
        }
    }

    /// Assemble the request from `options` without modifying them.
    ///
    /// `Accept` and `Content-Type` are set to `application/json` first; custom
    /// headers are applied afterwards and replace a default of the same name.
    pub fn build(&self, options: &RequestOptions) -> Result<PreparedRequest> {
        let mut headers: Vec<(String, String)> = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        for (name, value) in &options.headers {
            match headers.iter_mut().find(|(n, _)| n == name) {
                Some(existing) => existing.1 = value.clone(),
                None => headers.push((name.clone(), value.clone())),
            }
        }

        let body = if self.method.carries_body() {
            let value = serde_json::to_value(&options.data)
                .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
            Some(value)
        } else {
            None
        };

        Ok(PreparedRequest {
            method: self.method,
            endpoint: self.endpoint.clone(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_first() {
        let req = RequestBuilder::new(RequestMethod::Get, "/users")
            .build(&RequestOptions::new().header("X-Trace", "abc"))
            .unwrap();

        assert_eq!(req.headers[0], ("Accept".into(), "application/json".into()));
        assert_eq!(req.headers[1], ("Content-Type".into(), "application/json".into()));
        assert_eq!(req.header("X-Trace"), Some("abc"));
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn test_custom_header_overrides_default() {
        let options = RequestOptions::new()
            .header("Accept", "text/plain")
            .header("Content-Type", "application/merge-patch+json");
        let req = RequestBuilder::new(RequestMethod::Put, "/users/1")
            .build(&options)
            .unwrap();

        assert_eq!(req.header("Accept"), Some("text/plain"));
        assert_eq!(req.header("Content-Type"), Some("application/merge-patch+json"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn test_header_override_is_case_sensitive() {
        let options = RequestOptions::new().header("accept", "text/plain");
        let req = RequestBuilder::new(RequestMethod::Get, "/").build(&options).unwrap();

        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("text/plain"));
    }

    #[test]
    fn test_defaults_always_present() {
        for method in [
            RequestMethod::Get,
            RequestMethod::Post,
            RequestMethod::Put,
            RequestMethod::Delete,
        ] {
            let options = RequestOptions::new()
                .header("Authorization", "Bearer t")
                .data("name", "X");
            let req = RequestBuilder::new(method, "/x").build(&options).unwrap();
            assert!(req.header("Accept").is_some(), "{method} lost Accept");
            assert!(req.header("Content-Type").is_some(), "{method} lost Content-Type");
        }
    }

    #[test]
    fn test_body_only_for_post_and_put() {
        let options = RequestOptions::new().data("name", "X");

        for method in [RequestMethod::Post, RequestMethod::Put] {
            let req = RequestBuilder::new(method, "/users").build(&options).unwrap();
            assert_eq!(req.body, Some(serde_json::json!({"name": "X"})));
        }
        for method in [RequestMethod::Get, RequestMethod::Delete] {
            let req = RequestBuilder::new(method, "/users").build(&options).unwrap();
            assert!(req.body.is_none());
        }
    }

    #[test]
    fn test_empty_data_posts_empty_object() {
        let req = RequestBuilder::new(RequestMethod::Post, "/users")
            .build(&RequestOptions::new())
            .unwrap();
        assert_eq!(req.body, Some(serde_json::json!({})));
    }

    #[test]
    fn test_build_does_not_mutate_options() {
        let options = RequestOptions::new().data("a", "1").header("X-A", "1");
        let before = options.clone();
        RequestBuilder::new(RequestMethod::Post, "/a").build(&options).unwrap();
        assert_eq!(options, before);
    }

    #[test]
    fn test_last_write_wins() {
        let options = RequestOptions::new()
            .data("name", "first")
            .data("name", "second")
            .header("X-Env", "a")
            .header("X-Env", "b");
        assert_eq!(options.request_data().get("name").map(String::as_str), Some("second"));
        assert_eq!(options.headers().get("X-Env").map(String::as_str), Some("b"));

        let replaced = options.with_data([("email", "e@test.com")]);
        assert_eq!(replaced.request_data().len(), 1);
    }
}
