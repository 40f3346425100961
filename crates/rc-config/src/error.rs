//! Error types for restcheck-config.

/// Result type alias for restcheck-config operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for settings loading and validation.
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
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file is not valid JSON or has the wrong shape.
    #[error("JSON error: {0}")]
    Json(String),

    /// Environment variable holds a value that cannot be used.
    #[error("Environment variable {name}: {message}")]
    EnvVar { name: String, message: String },

    /// A setting is missing or out of range.
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
