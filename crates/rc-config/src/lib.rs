//! # restcheck-config
//!
//! Settings for the restcheck harness: where the API lives, how long a single
//! attempt may take, how many times to retry, and which environment the run
//! targets.
//!
//! Settings come from a JSON file, optionally overridden by `RESTCHECK_*`
//! environment variables:
//!
//! ```json
//! {
//!   "ApiSettings": {
//!     "BaseUrl": "https://api.example.test",
//!     "TimeoutInSeconds": 30,
//!     "MaxRetries": 3
//!   },
//!   "TestSettings": { "Environment": "test" }
//! }
//! ```
//!
//! ```rust,ignore
//! use restcheck_config::ApiSettings;
//!
//! let settings = ApiSettings::load_default()?.with_env_overrides()?;
//! ```

mod environment;
mod error;
mod settings;

pub use environment::Environment;
pub use error::{Error, ErrorKind, Result};
pub use settings::{
    default_path, ApiSettings, BASE_URL_VAR, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH,
    ENVIRONMENT_VAR, MAX_RETRIES_VAR, TIMEOUT_VAR,
};
