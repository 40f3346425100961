//! Stateful wrapper for step-style test scripts.
//!
//! A `Session` keeps a base URL, request data and headers between steps, and
//! remembers the last response so later steps can assert on it. Each send
//! hands an immutable snapshot of the options to [`ApiClient`].

use restcheck_config::ApiSettings;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestMethod, RequestOptions};
use crate::response::ApiResponse;

/// Single-owner request state plus the most recent response.
#[derive(Debug)]
pub struct Session {
    config: ClientConfig,
    client: Option<ApiClient>,
    options: RequestOptions,
    last_response: Option<ApiResponse>,
}

impl Session {
    /// A session with no base URL yet.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: None,
            options: RequestOptions::new(),
            last_response: None,
        }
    }

    /// A session targeting the base URL from `settings`.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        let mut session = Self::new(ClientConfig::from_settings(settings));
        session.set_base_url(&settings.base_url)?;
        Ok(session)
    }

    /// Point the session at a new base URL.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.client = Some(ApiClient::new(base_url, self.config.clone())?);
        Ok(())
    }

    /// Current base URL, if one has been set.
    pub fn base_url(&self) -> Option<&str> {
        self.client.as_ref().map(ApiClient::base_url)
    }

    /// Replace all request data.
    pub fn set_request_data<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options.replace_data(data);
        debug!(fields = self.options.request_data().len(), "Request data set");
    }

    /// Add or update one request-data field.
    pub fn add_request_data(&mut self, key: &str, value: &str) {
        debug!(key, value, "Request data added");
        self.options.insert_data(key, value);
    }

    /// Add or update one custom header.
    pub fn add_header(&mut self, name: &str, value: &str) {
        debug!(name, "Header added");
        self.options.insert_header(name, value);
    }

    /// Options the next send will use.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Send a GET request.
    pub async fn send_get(&mut self, endpoint: &str) -> Result<&ApiResponse> {
        self.send(RequestMethod::Get, endpoint).await
    }

    /// Send a POST request carrying the current request data.
    pub async fn send_post(&mut self, endpoint: &str) -> Result<&ApiResponse> {
        self.send(RequestMethod::Post, endpoint).await
    }

    /// Send a PUT request carrying the current request data.
    pub async fn send_put(&mut self, endpoint: &str) -> Result<&ApiResponse> {
        self.send(RequestMethod::Put, endpoint).await
    }

    /// Send a DELETE request.
    pub async fn send_delete(&mut self, endpoint: &str) -> Result<&ApiResponse> {
        self.send(RequestMethod::Delete, endpoint).await
    }

    /// Send a request. Errors only when no base URL has been set; every
    /// network outcome comes back as a response.
    pub async fn send(&mut self, method: RequestMethod, endpoint: &str) -> Result<&ApiResponse> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::MissingBaseUrl))?;

        let response = client.send(method, endpoint, &self.options).await;
        info!(
            method = %method,
            endpoint,
            status = response.status_code(),
            "Request completed"
        );
        Ok(self.last_response.insert(response))
    }

    /// The most recent response.
    pub fn last_response(&self) -> Option<&ApiResponse> {
        self.last_response.as_ref()
    }

    /// Log the last response's status, timing and content at INFO.
    pub fn log_last_response(&self) -> Result<&ApiResponse> {
        let response = self.require_last()?;
        info!(
            status = response.status_code(),
            elapsed_ms = response.response_time_ms(),
            content = response.content(),
            "Last response"
        );
        Ok(response)
    }

    /// Check the last response's status code.
    pub fn verify_status_code(&self, expected: u16) -> Result<()> {
        let actual = self.require_last()?.status_code();
        debug!(expected, actual, "Verifying status code");
        if actual != expected {
            return Err(assertion(format!("expected status {expected}, got {actual}")));
        }
        Ok(())
    }

    /// Check the last response is a JSON object containing `field`.
    pub fn verify_field_exists(&self, field: &str) -> Result<()> {
        let object = self.content_object()?;
        if !object.contains_key(field) {
            return Err(assertion(format!("response has no field {field:?}")));
        }
        Ok(())
    }

    /// Check a top-level field of the last response.
    ///
    /// String values compare without quotes; any other JSON value compares by
    /// its JSON text, so `1`, `true` and `null` are written as such.
    pub fn verify_field_value(&self, field: &str, expected: &str) -> Result<()> {
        let object = self.content_object()?;
        let value = object
            .get(field)
            .ok_or_else(|| assertion(format!("response has no field {field:?}")))?;

        let actual = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        debug!(field, expected, actual = %actual, "Verifying field value");

        if actual != expected {
            return Err(assertion(format!(
                "field {field:?}: expected {expected:?}, got {actual:?}"
            )));
        }
        Ok(())
    }

    fn require_last(&self) -> Result<&ApiResponse> {
        self.last_response
            .as_ref()
            .ok_or_else(|| assertion("no request has been sent yet".to_string()))
    }

    fn content_object(&self) -> Result<serde_json::Map<String, Value>> {
        match self.require_last()?.json::<Value>()? {
            Value::Object(map) => Ok(map),
            other => Err(assertion(format!(
                "response content is not a JSON object: {}",
                kind_name(&other)
            ))),
        }
    }
}

fn assertion(message: String) -> Error {
    Error::new(ErrorKind::Assertion(message))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_with(response: ApiResponse) -> Session {
        let mut session = Session::new(ClientConfig::default());
        session.last_response = Some(response);
        session
    }

    fn json_reply(body: &str) -> ApiResponse {
        ApiResponse::reply(200, body, Vec::new(), std::time::Duration::ZERO)
    }

    #[tokio::test]
    async fn test_send_before_base_url_fails_fast() {
        let mut session = Session::new(ClientConfig::default());
        let err = session.send_get("/users").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingBaseUrl));
        assert!(session.last_response().is_none());
    }

    #[tokio::test]
    async fn test_post_uses_state_at_send_time() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users"))
            .and(header("Authorization", "Bearer t"))
            .and(body_json(serde_json::json!({"name": "Test User", "email": "test@test.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":1}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut session = Session::new(ClientConfig::builder().without_retry().build());
        session.set_base_url(&mock_server.uri()).unwrap();
        session.set_request_data([("name", "Someone"), ("email", "test@test.com")]);
        session.add_request_data("name", "Test User");
        session.add_header("Authorization", "Bearer t");

        let response = session.send_post("/users").await.unwrap();
        assert_eq!(response.status_code(), 201);

        session.verify_status_code(201).unwrap();
        session.verify_field_exists("id").unwrap();
        session.verify_field_value("id", "1").unwrap();
    }

    #[test]
    fn test_set_base_url_validates() {
        let mut session = Session::new(ClientConfig::default());
        assert!(session.set_base_url("").is_err());
        assert!(session.base_url().is_none());

        session.set_base_url("https://api.example.test/").unwrap();
        assert_eq!(session.base_url(), Some("https://api.example.test"));
    }

    #[test]
    fn test_from_settings_presets_base_url() {
        let settings = ApiSettings::new("https://api.example.test", 30, 3, "test").unwrap();
        let session = Session::from_settings(&settings).unwrap();
        assert_eq!(session.base_url(), Some("https://api.example.test"));
    }

    #[test]
    fn test_verify_status_code() {
        let session = session_with(ApiResponse::reply(
            404,
            "",
            Vec::new(),
            std::time::Duration::ZERO,
        ));
        session.verify_status_code(404).unwrap();

        let err = session.verify_status_code(200).unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("expected status 200, got 404"));
    }

    #[test]
    fn test_verify_without_response() {
        let session = Session::new(ClientConfig::default());
        assert!(session.verify_status_code(200).unwrap_err().is_assertion());
        assert!(session.log_last_response().unwrap_err().is_assertion());
    }

    #[test]
    fn test_log_last_response() {
        let session = session_with(json_reply(r#"{"id":7}"#));
        let logged = session.log_last_response().unwrap();
        assert_eq!(logged.status_code(), 200);
        assert_eq!(logged.content(), r#"{"id":7}"#);
    }

    #[test]
    fn test_verify_field_value_kinds() {
        let session = session_with(json_reply(
            r#"{"name":"Ada","id":42,"active":true,"nick":null}"#,
        ));

        session.verify_field_value("name", "Ada").unwrap();
        session.verify_field_value("id", "42").unwrap();
        session.verify_field_value("active", "true").unwrap();
        session.verify_field_value("nick", "null").unwrap();

        assert!(session.verify_field_value("name", "Bob").unwrap_err().is_assertion());
        assert!(session.verify_field_value("missing", "x").unwrap_err().is_assertion());
    }

    #[test]
    fn test_verify_field_exists() {
        let session = session_with(json_reply(r#"{"id":1}"#));
        session.verify_field_exists("id").unwrap();
        assert!(session.verify_field_exists("email").is_err());
    }

    #[test]
    fn test_verify_field_on_non_object() {
        let session = session_with(json_reply("[1,2]"));
        let err = session.verify_field_exists("id").unwrap_err();
        assert!(err.to_string().contains("array"));

        let session = session_with(json_reply("not json"));
        let err = session.verify_field_exists("id").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Deserialize(_)));
    }
}
