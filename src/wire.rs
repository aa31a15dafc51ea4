use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::AutomationError;
use crate::selector::By;

/// W3C WebDriver element key. WinAppDriver itself speaks the legacy JSON wire
/// protocol (`ELEMENT`), but Appium front-ends may hand back either shape.
pub(crate) const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// JSON-wire status code for "no such element".
const STATUS_NO_SUCH_ELEMENT: i64 = 7;

// Individual command round-trips are local and fast; this bounds a wedged
// server, not a slow element search (searches are polled by the caller).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Session capabilities sent on session creation.
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    #[serde(rename = "platformName")]
    pub platform_name: String,
    #[serde(rename = "deviceName")]
    pub device_name: String,
    /// Path to the application executable; the server launches it.
    pub app: String,
}

impl Capabilities {
    /// The capability set for a Windows desktop app launched from `app_path`.
    pub fn windows_app(app_path: &str) -> Self {
        Self {
            platform_name: "Windows".to_string(),
            device_name: "WindowsPC".to_string(),
            app: app_path.to_string(),
        }
    }
}

/// Response envelope shared by every WebDriver command.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    status: Option<i64>,
    #[serde(default)]
    value: Value,
}

/// Lightweight blocking WebDriver client for a WinAppDriver endpoint.
///
/// Only the handful of commands the smoke harness needs; the server and its
/// protocol are external collaborators, this is glue.
#[derive(Debug, Clone)]
pub struct DriverClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl DriverClient {
    pub fn new(base_url: &str) -> Result<Self, AutomationError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a session, returning its id. One successful call here means the
    /// server has launched the application under test.
    pub fn new_session(&self, capabilities: &Capabilities) -> Result<String, AutomationError> {
        let body = json!({ "desiredCapabilities": capabilities });
        let response = self.post("/session", &body)?;

        // JSON wire puts the id top-level; W3C nests it under value.
        if let Some(id) = response.session_id {
            return Ok(id);
        }
        if let Some(id) = response.value.get("sessionId").and_then(Value::as_str) {
            return Ok(id.to_string());
        }
        Err(AutomationError::Protocol(format!(
            "session response carried no session id: {}",
            response.value
        )))
    }

    pub fn find_element(
        &self,
        session_id: &str,
        by: &By,
    ) -> Result<String, AutomationError> {
        let body = json!({ "using": by.strategy(), "value": by.value() });
        let response = self.post(&format!("/session/{session_id}/element"), &body);

        let response = match response {
            Err(AutomationError::Driver { status, .. }) if status == STATUS_NO_SUCH_ELEMENT => {
                return Err(AutomationError::ElementNotFound(by.to_string()));
            }
            other => other?,
        };

        extract_element_id(&response.value)
            .ok_or_else(|| {
                AutomationError::Protocol(format!(
                    "find response carried no element id: {}",
                    response.value
                ))
            })
    }

    pub fn is_displayed(
        &self,
        session_id: &str,
        element_id: &str,
    ) -> Result<bool, AutomationError> {
        let response =
            self.get(&format!("/session/{session_id}/element/{element_id}/displayed"))?;
        response.value.as_bool().ok_or_else(|| {
            AutomationError::Protocol(format!("displayed was not a bool: {}", response.value))
        })
    }

    /// Reads an element attribute; `None` when the server reports null.
    pub fn attribute(
        &self,
        session_id: &str,
        element_id: &str,
        name: &str,
    ) -> Result<Option<String>, AutomationError> {
        let response = self.get(&format!(
            "/session/{session_id}/element/{element_id}/attribute/{name}"
        ))?;
        match &response.value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Ok(Some(other.to_string())),
        }
    }

    pub fn text(&self, session_id: &str, element_id: &str) -> Result<String, AutomationError> {
        let response = self.get(&format!("/session/{session_id}/element/{element_id}/text"))?;
        match &response.value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    pub fn click(&self, session_id: &str, element_id: &str) -> Result<(), AutomationError> {
        self.post(
            &format!("/session/{session_id}/element/{element_id}/click"),
            &json!({}),
        )?;
        Ok(())
    }

    pub fn clear(&self, session_id: &str, element_id: &str) -> Result<(), AutomationError> {
        self.post(
            &format!("/session/{session_id}/element/{element_id}/clear"),
            &json!({}),
        )?;
        Ok(())
    }

    /// Sends a key sequence to an element. `keys` are the individual key
    /// values of the sequence (JSON-wire `POST .../value` shape).
    pub fn send_keys(
        &self,
        session_id: &str,
        element_id: &str,
        keys: &[String],
    ) -> Result<(), AutomationError> {
        self.post(
            &format!("/session/{session_id}/element/{element_id}/value"),
            &json!({ "value": keys }),
        )?;
        Ok(())
    }

    /// Asks the server to close the application it launched for this session.
    pub fn close_app(&self, session_id: &str) -> Result<(), AutomationError> {
        self.post(&format!("/session/{session_id}/appium/app/close"), &json!({}))?;
        Ok(())
    }

    /// Ends the session. The server reaps whatever the app left behind.
    pub fn delete_session(&self, session_id: &str) -> Result<(), AutomationError> {
        let url = format!("{}/session/{session_id}", self.base_url);
        let response = self.http.delete(&url).send()?;
        Self::parse(response)?;
        Ok(())
    }

    fn get(&self, path: &str) -> Result<WireResponse, AutomationError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let response = self.http.get(&url).send()?;
        Self::parse(response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<WireResponse, AutomationError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send()?;
        Self::parse(response)
    }

    /// Decode the response envelope and turn command failures into errors.
    fn parse(response: reqwest::blocking::Response) -> Result<WireResponse, AutomationError> {
        let http_status = response.status();
        let body = response.text()?;

        let wire: WireResponse = match serde_json::from_str(&body) {
            Ok(wire) => wire,
            Err(_) if http_status.is_success() && body.trim().is_empty() => WireResponse {
                session_id: None,
                status: None,
                value: Value::Null,
            },
            Err(e) => {
                warn!(%http_status, "unparseable driver response: {body}");
                return Err(AutomationError::Protocol(format!(
                    "HTTP {http_status}: could not decode response body ({e})"
                )));
            }
        };

        // JSON wire reports failure via a non-zero status even on HTTP 200;
        // W3C uses the HTTP status plus an error payload.
        let failed = !http_status.is_success() || wire.status.is_some_and(|s| s != 0);
        if failed {
            let status = wire.status.unwrap_or_else(|| http_status.as_u16() as i64);
            let message = error_message(&wire.value)
                .unwrap_or_else(|| format!("HTTP {http_status}"));
            return Err(AutomationError::Driver { status, message });
        }

        Ok(wire)
    }
}

pub(crate) fn extract_element_id(value: &Value) -> Option<String> {
    value
        .get("ELEMENT")
        .or_else(|| value.get(W3C_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
