//! Normalized record of one HTTP exchange.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind};
use crate::parse::{parse, DeserializeError};

/// Returns true for 2xx status codes.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Category of a failure that prevented an HTTP status from being obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Request,
    Body,
    Other,
}

/// Detail of a transport failure, kept on the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&Error> for TransportFailure {
    fn from(err: &Error) -> Self {
        let kind = match err.kind {
            ErrorKind::Timeout(_) => FailureKind::Timeout,
            ErrorKind::Connection(_) => FailureKind::Connect,
            ErrorKind::Request(_) | ErrorKind::Serialization(_) => FailureKind::Request,
            ErrorKind::Body(_) => FailureKind::Body,
            _ => FailureKind::Other,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one send call: either an HTTP reply of any status or a
/// transport failure. Never modified after it is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status_code: u16,
    content: String,
    is_successful: bool,
    headers: Vec<(String, String)>,
    response_time: Duration,
    failure: Option<TransportFailure>,
}

impl ApiResponse {
    /// A completed HTTP exchange.
    pub fn reply(
        status_code: u16,
        content: impl Into<String>,
        headers: Vec<(String, String)>,
        response_time: Duration,
    ) -> Self {
        Self {
            status_code,
            content: content.into(),
            is_successful: true,
            headers,
            response_time,
            failure: None,
        }
    }

    /// An exchange that failed below the HTTP layer.
    ///
    /// Status is 0 and the content carries the failure message.
    pub fn failed(failure: TransportFailure, response_time: Duration) -> Self {
        Self {
            status_code: 0,
            content: failure.message.clone(),
            is_successful: false,
            headers: Vec::new(),
            response_time,
            failure: Some(failure),
        }
    }

    pub(crate) fn from_error(err: &Error, response_time: Duration) -> Self {
        Self::failed(TransportFailure::from(err), response_time)
    }

    /// HTTP status, or 0 when none was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw body text. Empty when nothing was received.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the transport completed and a status was obtained,
    /// whatever that status is.
    pub fn is_successful(&self) -> bool {
        self.is_successful
    }

    /// True for 2xx statuses.
    pub fn is_success_status_code(&self) -> bool {
        is_success_status(self.status_code)
    }

    /// Response headers in arrival order, duplicates included.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every header keyed by lower-cased name. Later duplicates win.
    pub fn all_headers(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect()
    }

    /// Wall-clock time of the whole retried operation.
    pub fn response_time(&self) -> Duration {
        self.response_time
    }

    /// [`response_time`](Self::response_time) in whole milliseconds.
    pub fn response_time_ms(&self) -> u64 {
        u64::try_from(self.response_time.as_millis()).unwrap_or(u64::MAX)
    }

    /// Transport failure detail, present exactly when `status_code() == 0`.
    pub fn failure(&self) -> Option<&TransportFailure> {
        self.failure.as_ref()
    }

    /// Deserialize the content into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DeserializeError> {
        parse(&self.content)
    }
}
