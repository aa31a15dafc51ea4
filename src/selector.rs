use std::fmt;

/// Represents ways to locate a UI element through the automation server.
///
/// WinAppDriver resolves `Name` against the element's UIA name (label or window
/// title) and `AccessibilityId` against its `AutomationId`, which stays stable
/// across localization and text changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// Select by name/label.
    Name(String),
    /// Select by accessibility ID.
    AccessibilityId(String),
}

impl By {
    pub fn name(value: impl Into<String>) -> Self {
        By::Name(value.into())
    }

    pub fn accessibility_id(value: impl Into<String>) -> Self {
        By::AccessibilityId(value.into())
    }

    /// The locator strategy string sent over the wire.
    pub fn strategy(&self) -> &'static str {
        match self {
            By::Name(_) => "name",
            By::AccessibilityId(_) => "accessibility id",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            By::Name(v) => v,
            By::AccessibilityId(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}
