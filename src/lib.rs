//! # restcheck
//!
//! Client layer for REST API test harnesses.
//!
//! Test code issues GET/POST/PUT/DELETE calls against a configured base URL
//! and always gets back a normalized response: HTTP status, body, headers and
//! the wall-clock time of the whole retried operation. Transport failures are
//! retried with exponential backoff and then reported inside the response.
//!
//! ## Crates
//!
//! - **restcheck-config** - Settings file, environment overrides, log tiers
//! - **restcheck-client** - Request building, retry, execution, parsing, sessions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restcheck::{ApiSettings, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ApiSettings::load_default()?.with_env_overrides()?;
//!     restcheck::logging::init(&settings);
//!
//!     let mut session = Session::from_settings(&settings)?;
//!     session.add_request_data("name", "Test User");
//!     session.send_post("/users").await?;
//!
//!     session.verify_status_code(201)?;
//!     session.verify_field_exists("id")?;
//!
//!     Ok(())
//! }
//! ```

pub mod logging;

// Re-export all crates for convenient access
pub use restcheck_client as client;
pub use restcheck_config as config;

// Re-export commonly used types at the top level
pub use restcheck_client::{
    parse, ApiClient, ApiResponse, ClientConfig, RequestMethod, RequestOptions, RetryConfig,
    Session,
};
pub use restcheck_config::ApiSettings;
