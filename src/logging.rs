//! Subscriber setup for harness binaries and test suites.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use restcheck_config::ApiSettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file written under the configured report directory.
pub const LOG_FILE_NAME: &str = "restcheck.log";

/// Build the filter for `settings`.
///
/// The environment tier picks the default level; `RUST_LOG` directives take
/// precedence when set.
pub fn filter(settings: &ApiSettings) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(settings.environment().log_level().into())
        .from_env_lossy()
}

/// Where the report log goes, if `settings` names a report directory.
pub fn log_file_path(settings: &ApiSettings) -> Option<PathBuf> {
    settings
        .report_path
        .as_ref()
        .map(|dir| dir.join(LOG_FILE_NAME))
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install a global subscriber for `settings`.
///
/// Events go to stdout, and also to [`LOG_FILE_NAME`] under the report
/// directory when one is configured. Returns `false` when a subscriber was
/// already installed, in which case the existing one is left in place.
pub fn init(settings: &ApiSettings) -> bool {
    let mut file_error = None;
    let file_layer = log_file_path(settings).and_then(|path| match open_log_file(&path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(err) => {
            file_error = Some((path, err));
            None
        }
    });

    let installed = tracing_subscriber::registry()
        .with(filter(settings))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            environment = %settings.environment,
            base_url = %settings.base_url,
            "Logging initialized"
        );
        if let Some((path, err)) = file_error {
            tracing::warn!(path = %path.display(), error = %err, "Report log file unavailable");
        }
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn settings(environment: &str) -> ApiSettings {
        ApiSettings::new("https://api.example.test", 30, 3, environment).unwrap()
    }

    #[test]
    fn test_init_is_idempotent() {
        init(&settings("test"));
        assert!(!init(&settings("test")));
    }

    #[test]
    fn test_filter_uses_environment_tier() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(
            filter(&settings("production")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            filter(&settings("dev")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_log_file_follows_report_path() {
        assert_eq!(log_file_path(&settings("test")), None);

        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings("test");
        settings.report_path = Some(dir.path().join("reports"));

        let path = log_file_path(&settings).unwrap();
        assert_eq!(path, dir.path().join("reports").join(LOG_FILE_NAME));

        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }
}
