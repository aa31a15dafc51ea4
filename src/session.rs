use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::element::Element;
use crate::errors::AutomationError;
use crate::poll::{poll_until, retry_fixed};
use crate::selector::By;
use crate::wire::{Capabilities, DriverClient};

/// How long `wait_visible` polls by default; window creation after app launch
/// can be slow on a loaded CI host.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A live automation session: the connection to the server plus the launched
/// application process behind it.
///
/// Owned exclusively by one test module for its whole duration. Dropping the
/// session closes the application and ends the session; both steps run on
/// every exit path, and their failures are logged but never raised, so that a
/// cleanup hiccup cannot mask the original test failure.
#[derive(Debug)]
pub struct Session {
    client: DriverClient,
    session_id: String,
}

impl Session {
    /// Establish a session against the configured server.
    ///
    /// The server is usually started moments before the test run, so creation
    /// races its startup; transport failures are retried on the config's fixed
    /// budget and the last error surfaces once it is spent. Configuration
    /// problems never reach the retry loop — `HarnessConfig` resolution has
    /// already failed by then.
    pub fn bootstrap(config: &HarnessConfig) -> Result<Self, AutomationError> {
        let client = DriverClient::new(&config.server_url)?;
        let capabilities = Capabilities::windows_app(&config.app_path.to_string_lossy());

        info!(
            server = %config.server_url,
            app = %config.app_path.display(),
            "creating automation session"
        );

        let session_id = retry_fixed(config.connect_attempts, config.connect_delay, || {
            client.new_session(&capabilities)
        })?;

        info!(%session_id, "session established");
        Ok(Self { client, session_id })
    }

    /// Bootstrap from the process environment. See [`HarnessConfig::from_env`].
    pub fn from_env() -> Result<Self, AutomationError> {
        Self::bootstrap(&HarnessConfig::from_env()?)
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }

    pub(crate) fn client(&self) -> &DriverClient {
        &self.client
    }

    /// Locate an element right now, without waiting.
    pub fn find(&self, by: &By) -> Result<Element<'_>, AutomationError> {
        let element_id = self.client.find_element(&self.session_id, by)?;
        Ok(Element::new(self, element_id, by.to_string()))
    }

    /// Wait until an element matching `by` exists and is displayed.
    ///
    /// Lookup misses keep the poll going; anything else (transport loss, a
    /// dead session) aborts immediately. Expiry yields a `Timeout` error
    /// naming the locator.
    pub fn wait_visible(
        &self,
        by: &By,
        timeout: Duration,
    ) -> Result<Element<'_>, AutomationError> {
        let what = format!("element {by} to become visible");
        let element_id = poll_until(timeout, VISIBILITY_POLL_INTERVAL, &what, || {
            let element_id = match self.client.find_element(&self.session_id, by) {
                Ok(id) => id,
                Err(AutomationError::ElementNotFound(_)) => return Ok(None),
                Err(e) => return Err(e),
            };
            if self.client.is_displayed(&self.session_id, &element_id)? {
                Ok(Some(element_id))
            } else {
                debug!(%by, "element present but not displayed yet");
                Ok(None)
            }
        })?;

        Ok(Element::new(self, element_id, by.to_string()))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(session_id = %self.session_id, "tearing down session");
        if let Err(e) = self.client.close_app(&self.session_id) {
            warn!("failed to close application during teardown: {e}");
        }
        if let Err(e) = self.client.delete_session(&self.session_id) {
            warn!("failed to end session during teardown: {e}");
        }
    }
}
