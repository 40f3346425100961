//! Error types for restcheck-client.

use crate::parse::DeserializeError;

/// Result type alias for restcheck-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for restcheck-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error happened below the HTTP layer, before a
    /// status could be obtained.
    pub fn is_transport(&self) -> bool {
        self.kind.is_transport()
    }

    /// Returns true if this is an assertion mismatch.
    pub fn is_assertion(&self) -> bool {
        matches!(self.kind, ErrorKind::Assertion(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The attempt exceeded the configured timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// DNS, TCP or TLS connection failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure while sending the request.
    #[error("Request error: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("Body error: {0}")]
    Body(String),

    /// The request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON error outside of the typed parse helper.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request was attempted before a base URL was set.
    #[error("Base URL has not been set; call set_base_url before sending requests")]
    MissingBaseUrl,

    /// A response did not match an expectation.
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Response content did not match the requested shape.
    #[error("{0}")]
    Deserialize(String),
}

impl ErrorKind {
    /// Returns true for failures that prevented an HTTP status from being obtained.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout(_)
                | ErrorKind::Connection(_)
                | ErrorKind::Request(_)
                | ErrorKind::Body(_)
                | ErrorKind::Serialization(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        let kind = if err.is_timeout() {
            ErrorKind::Timeout(message)
        } else if err.is_connect() {
            ErrorKind::Connection(message)
        } else if err.is_body() || err.is_decode() {
            ErrorKind::Body(message)
        } else if err.is_builder() {
            ErrorKind::Config(message)
        } else {
            ErrorKind::Request(message)
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

impl From<restcheck_config::Error> for Error {
    fn from(err: restcheck_config::Error) -> Self {
        Error::with_source(ErrorKind::Config(err.to_string()), err)
    }
}

impl From<DeserializeError> for Error {
    fn from(err: DeserializeError) -> Self {
        Error::with_source(ErrorKind::Deserialize(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        for kind in [
            ErrorKind::Timeout("t".into()),
            ErrorKind::Connection("c".into()),
            ErrorKind::Request("r".into()),
            ErrorKind::Body("b".into()),
            ErrorKind::Serialization("s".into()),
        ] {
            assert!(kind.is_transport(), "{kind} should be a transport failure");
        }

        for kind in [
            ErrorKind::Config("c".into()),
            ErrorKind::MissingBaseUrl,
            ErrorKind::Assertion("a".into()),
            ErrorKind::Deserialize("d".into()),
            ErrorKind::Json("j".into()),
        ] {
            assert!(!kind.is_transport(), "{kind} should not be a transport failure");
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::new(ErrorKind::MissingBaseUrl);
        assert!(err.to_string().contains("set_base_url"));

        let err = Error::new(ErrorKind::Assertion("expected 200, got 404".into()));
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Assertion failed: expected 200, got 404");
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_from_config_error() {
        let cfg = restcheck_config::ApiSettings::new("", 30, 3, "test").unwrap_err();
        let err: Error = cfg.into();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
        assert!(err.source.is_some());
    }

    #[tokio::test]
    async fn test_from_reqwest_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap_err();
        let err: Error = err.into();
        assert!(err.is_transport());
        assert!(matches!(err.kind, ErrorKind::Connection(_)));
    }
}
