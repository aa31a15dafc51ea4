use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::errors::AutomationError;

/// Required: path to the rust-switcher.exe binary under test.
pub const APP_PATH_VAR: &str = "RUST_SWITCHER_EXE";
/// Optional: overrides the WinAppDriver endpoint.
pub const SERVER_URL_VAR: &str = "WINAPPDRIVER_URL";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723/wd/hub";

// WinAppDriver is typically started right before the test run, so session
// creation races against server startup. The original harness retried 20 times
// at one-second intervals.
const DEFAULT_CONNECT_ATTEMPTS: u32 = 20;
const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(1);

/// Everything the session bootstrapper needs, resolved up front so that a bad
/// environment fails before the first connection attempt.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Absolute path to the application executable under test.
    pub app_path: PathBuf,
    /// WinAppDriver endpoint, e.g. `http://127.0.0.1:4723/wd/hub`.
    pub server_url: String,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
}

impl HarnessConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, AutomationError> {
        Self::resolve(env::var_os(APP_PATH_VAR), env::var_os(SERVER_URL_VAR))
    }

    /// Resolution logic, split out from `from_env` so tests can exercise it
    /// without mutating process-global environment variables.
    pub(crate) fn resolve(
        app_path: Option<OsString>,
        server_url: Option<OsString>,
    ) -> Result<Self, AutomationError> {
        let app_path = app_path.ok_or_else(|| {
            AutomationError::Config(format!(
                "{APP_PATH_VAR} must point to rust-switcher.exe"
            ))
        })?;

        let app_path = PathBuf::from(app_path);
        // Canonicalize doubles as the existence check and makes the capability
        // we hand to the server absolute.
        let app_path = app_path.canonicalize().map_err(|e| {
            AutomationError::Config(format!(
                "{APP_PATH_VAR} does not exist: {} ({e})",
                app_path.display()
            ))
        })?;

        let server_url = match server_url {
            Some(url) => url.into_string().map_err(|raw| {
                AutomationError::Config(format!(
                    "{SERVER_URL_VAR} is not valid UTF-8: {raw:?}"
                ))
            })?,
            None => DEFAULT_SERVER_URL.to_string(),
        };

        debug!(app = %app_path.display(), server = %server_url, "resolved harness config");

        Ok(Self {
            app_path,
            server_url,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_delay: DEFAULT_CONNECT_DELAY,
        })
    }
}
