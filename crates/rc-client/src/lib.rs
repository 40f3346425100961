//! # restcheck-client
//!
//! HTTP request pipeline for REST API test harnesses.
//!
//! This crate provides:
//! - Request building with default JSON headers and per-call options
//! - Retry with exponential backoff on transport failures
//! - Wall-clock timing of the whole retried operation
//! - Normalized [`ApiResponse`] values that never surface transport errors
//! - A typed [`parse`] helper with truncated diagnostics
//! - A stateful [`Session`] with response assertions
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                             │
//! │  - Base URL, request data and headers between steps         │
//! │  - Last response and verify_* assertions                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ApiClient                            │
//! │  - Immutable; RequestOptions passed per call                │
//! │  - RetryPolicy around each attempt                          │
//! │  - Timing and response normalization                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use restcheck_client::{ApiClient, ClientConfig, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restcheck_client::Error> {
//!     let client = ApiClient::new("https://api.example.com", ClientConfig::default())?;
//!
//!     let options = RequestOptions::new()
//!         .data("name", "Test User")
//!         .header("Authorization", "Bearer token");
//!     let response = client.send_post("/users", &options).await;
//!
//!     if response.is_successful() {
//!         let created: serde_json::Value = response.json()?;
//!         println!("{} in {}ms: {created}", response.status_code(), response.response_time_ms());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod parse;
mod request;
mod response;
mod retry;
mod session;

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use parse::{parse, DeserializeError, PREVIEW_CHARS};
pub use request::{PreparedRequest, RequestBuilder, RequestMethod, RequestOptions};
pub use response::{is_success_status, ApiResponse, FailureKind, TransportFailure};
pub use retry::{RetryConfig, RetryPolicy};
pub use session::Session;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("restcheck/", env!("CARGO_PKG_VERSION"));
