//! Request executor: build, send with retry, time and normalize.

use std::time::Instant;

use restcheck_config::ApiSettings;
use tracing::{debug, error, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{PreparedRequest, RequestBuilder, RequestMethod, RequestOptions};
use crate::response::ApiResponse;
use crate::retry::RetryPolicy;

/// Bodies longer than this are not written to the debug log.
const MAX_LOGGED_CONTENT_CHARS: usize = 5000;

/// HTTP client bound to one base URL.
///
/// Every send method returns an [`ApiResponse`]; transport failures are
/// reported inside it rather than as errors. The client holds no per-request
/// state, so it can be cloned and shared between tasks freely.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: String,
    config: ClientConfig,
}

/// What came back from a single successful attempt.
struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    content: String,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// Fails if the base URL is empty or unparseable, or the underlying
    /// client cannot be built.
    pub fn new(base_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::new(ErrorKind::MissingBaseUrl));
        }
        url::Url::parse(base_url)?;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        info!(
            base_url,
            timeout_secs = config.timeout.as_secs(),
            max_retries = config.retry.max_retries,
            "API base URL set"
        );

        Ok(Self {
            inner,
            base_url: base_url.to_string(),
            config,
        })
    }

    /// Create a client from harness settings.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::new(&settings.base_url, ClientConfig::from_settings(settings))
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint against the base URL.
    ///
    /// Absolute `http://` and `https://` endpoints are used as-is.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Send a GET request.
    pub async fn send_get(&self, endpoint: &str, options: &RequestOptions) -> ApiResponse {
        self.send(RequestMethod::Get, endpoint, options).await
    }

    /// Send a POST request with the request data as a JSON body.
    pub async fn send_post(&self, endpoint: &str, options: &RequestOptions) -> ApiResponse {
        self.send(RequestMethod::Post, endpoint, options).await
    }

    /// Send a PUT request with the request data as a JSON body.
    pub async fn send_put(&self, endpoint: &str, options: &RequestOptions) -> ApiResponse {
        self.send(RequestMethod::Put, endpoint, options).await
    }

    /// Send a DELETE request.
    pub async fn send_delete(&self, endpoint: &str, options: &RequestOptions) -> ApiResponse {
        self.send(RequestMethod::Delete, endpoint, options).await
    }

    /// Build, send with retry, and normalize the outcome.
    ///
    /// The recorded response time spans from the first attempt to the final
    /// settlement, backoff sleeps included.
    #[instrument(skip(self, options))]
    pub async fn send(
        &self,
        method: RequestMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> ApiResponse {
        let url = self.url(endpoint);
        let start = Instant::now();

        let outcome = match RequestBuilder::new(method, endpoint).build(options) {
            Ok(request) => {
                let mut policy = RetryPolicy::new(self.config.retry.clone());
                policy.execute(|| self.execute_once(&request, &url)).await
            }
            Err(err) => Err(err),
        };
        let elapsed = start.elapsed();

        match outcome {
            Ok(reply) => {
                let response =
                    ApiResponse::reply(reply.status, reply.content, reply.headers, elapsed);
                if self.config.enable_tracing {
                    log_response(method, &url, &response);
                }
                response
            }
            Err(err) => {
                error!(
                    method = %method,
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "Request failed"
                );
                ApiResponse::from_error(&err, elapsed)
            }
        }
    }

    /// A single attempt without retry.
    async fn execute_once(&self, request: &PreparedRequest, url: &str) -> Result<Reply> {
        let mut req = self.inner.request(request.method.to_reqwest(), url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        if self.config.enable_tracing {
            match request.body {
                Some(ref body) => info!(
                    method = %request.method,
                    url,
                    body = %body,
                    "API request sent"
                ),
                None => info!(method = %request.method, url, "API request sent"),
            }
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let content = response.text().await?;

        Ok(Reply {
            status,
            headers,
            content,
        })
    }
}

fn log_response(method: RequestMethod, url: &str, response: &ApiResponse) {
    info!(
        method = %method,
        url,
        status = response.status_code(),
        elapsed_ms = response.response_time_ms(),
        content_length = response.content().len(),
        "API response received"
    );

    let content = response.content();
    if !content.is_empty() && content.chars().count() <= MAX_LOGGED_CONTENT_CHARS {
        debug!(content, "API response content");
    }
}
