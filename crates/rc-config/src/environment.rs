//! Deployment environment names and the log verbosity tier they select.

use tracing::level_filters::LevelFilter;

/// The environment a test run targets.
///
/// Only used to pick how chatty logging is; request execution never looks at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Test,
    Development,
    /// Any name not recognized above, kept verbatim.
    Other(String),
}

impl Environment {
    /// Parse an environment name. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Environment::Production,
            "staging" => Environment::Staging,
            "test" => Environment::Test,
            "dev" | "development" => Environment::Development,
            _ => Environment::Other(name.to_string()),
        }
    }

    /// Default log level for this environment.
    pub fn log_level(&self) -> LevelFilter {
        match self {
            Environment::Production => LevelFilter::INFO,
            Environment::Staging | Environment::Test => LevelFilter::DEBUG,
            Environment::Development => LevelFilter::TRACE,
            Environment::Other(_) => LevelFilter::DEBUG,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Staging => f.write_str("staging"),
            Environment::Test => f.write_str("test"),
            Environment::Development => f.write_str("development"),
            Environment::Other(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Environment::from_name("prod"), Environment::Production);
        assert_eq!(Environment::from_name("Production"), Environment::Production);
        assert_eq!(Environment::from_name("DEV"), Environment::Development);
        assert_eq!(Environment::from_name("staging"), Environment::Staging);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(
            Environment::from_name("qa-east"),
            Environment::Other("qa-east".to_string())
        );
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(Environment::Production.log_level(), LevelFilter::INFO);
        assert_eq!(Environment::Staging.log_level(), LevelFilter::DEBUG);
        assert_eq!(Environment::Test.log_level(), LevelFilter::DEBUG);
        assert_eq!(Environment::Development.log_level(), LevelFilter::TRACE);
        assert_eq!(
            Environment::Other("qa".into()).log_level(),
            LevelFilter::DEBUG
        );
    }

    #[test]
    fn test_display_round_trips_known_names() {
        for name in ["production", "staging", "test", "development"] {
            assert_eq!(Environment::from_name(name).to_string(), name);
        }
    }
}
