//! End-to-end smoke harness for the RustSwitcher desktop application.
//!
//! RustSwitcher itself runs as an external Windows GUI binary; this crate is
//! the glue that drives it through a WebDriver-compatible automation server
//! (WinAppDriver). The harness resolves the executable path and server
//! endpoint from the environment, establishes a session with bounded retry
//! (the server is typically still starting when the test run begins), locates
//! controls by name or accessibility id, and asserts visibility and
//! text-change behavior with bounded polling. The session guarantees teardown
//! of both the application and the server-side session on every exit path.
//!
//! ```no_run
//! use std::time::Duration;
//! use rust_switcher_e2e::{By, Session};
//!
//! let session = Session::from_env()?;
//! let window = session.wait_visible(&By::name("RustSwitcher"), Duration::from_secs(60))?;
//! assert!(window.is_displayed()?);
//! # Ok::<(), rust_switcher_e2e::AutomationError>(())
//! ```

pub mod config;
pub mod element;
pub mod errors;
pub mod poll;
pub mod selector;
pub mod session;
#[cfg(test)]
mod tests;
pub mod wire;

pub use config::HarnessConfig;
pub use element::{keys, Element};
pub use errors::AutomationError;
pub use selector::By;
pub use session::{Session, DEFAULT_WAIT_TIMEOUT};
pub use wire::{Capabilities, DriverClient};
