use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::errors::AutomationError;
use crate::poll::poll_until;
use crate::session::Session;

/// WebDriver key codepoints used by this harness.
pub mod keys {
    /// Releases every held modifier.
    pub const NULL: char = '\u{e000}';
    pub const CONTROL: char = '\u{e009}';
    pub const DELETE: char = '\u{e017}';
}

const VALUE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Represents a UI element located through the automation server.
///
/// Borrows the session: elements never outlive the session that produced them,
/// matching the single-owner lifecycle of the whole fixture.
pub struct Element<'a> {
    session: &'a Session,
    id: String,
    /// The locator that found this element, kept for log and error context.
    description: String,
}

impl<'a> Element<'a> {
    pub(crate) fn new(session: &'a Session, id: String, description: String) -> Self {
        Self {
            session,
            id,
            description,
        }
    }

    pub fn is_displayed(&self) -> Result<bool, AutomationError> {
        self.session
            .client()
            .is_displayed(self.session.id(), &self.id)
    }

    /// The element's displayed text.
    ///
    /// UIA-backed controls surface an edit field's content through the value
    /// pattern (`Value.Value`) and static text through `Text`; read the former
    /// first and fall back, with null mapping to the empty string.
    pub fn text_value(&self) -> Result<String, AutomationError> {
        let client = self.session.client();
        if let Some(v) = client.attribute(self.session.id(), &self.id, "Value.Value")? {
            return Ok(v);
        }
        Ok(client
            .attribute(self.session.id(), &self.id, "Text")?
            .unwrap_or_default())
    }

    pub fn click(&self) -> Result<(), AutomationError> {
        debug!(element = %self.description, "click");
        self.session.client().click(self.session.id(), &self.id)
    }

    pub fn clear(&self) -> Result<(), AutomationError> {
        self.session.client().clear(self.session.id(), &self.id)
    }

    /// Types a literal string into the element.
    pub fn send_keys(&self, text: &str) -> Result<(), AutomationError> {
        self.send_key_sequence(&[text.to_string()])
    }

    /// Replace the element's current text with `text`.
    ///
    /// Click to focus, Ctrl+A to select everything, Delete, then type. More
    /// reliable against WinAppDriver than `clear`, which some edit controls
    /// ignore.
    pub fn set_text(&self, text: &str) -> Result<(), AutomationError> {
        debug!(element = %self.description, %text, "set text");
        self.click()?;
        self.send_key_sequence(&[
            keys::CONTROL.to_string(),
            "a".to_string(),
            keys::NULL.to_string(),
        ])?;
        self.send_key_sequence(&[keys::DELETE.to_string()])?;
        self.send_keys(text)
    }

    /// Poll [`text_value`](Self::text_value) until it differs from `before`.
    ///
    /// Input actions travel over the automation protocol, so a read issued
    /// right after a write may still see the old value; never assume the
    /// update is synchronous.
    pub fn wait_value_changed(
        &self,
        before: &str,
        timeout: Duration,
    ) -> Result<String, AutomationError> {
        let what = format!("value of {} to change", self.description);
        poll_until(timeout, VALUE_POLL_INTERVAL, &what, || {
            let current = self.text_value()?;
            Ok((current != before).then_some(current))
        })
    }

    fn send_key_sequence(&self, keys: &[String]) -> Result<(), AutomationError> {
        self.session
            .client()
            .send_keys(self.session.id(), &self.id, keys)
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish()
    }
}
