//! The end-to-end smoke scenario: launch RustSwitcher through WinAppDriver,
//! check the main controls are present, change the autoconvert delay, cancel.
//!
//! Needs a running WinAppDriver (or one about to start; bootstrap retries) and
//! `RUST_SWITCHER_EXE` pointing at the built binary, so it is ignored by
//! default:
//!
//! ```text
//! RUST_SWITCHER_EXE=target/release/rust-switcher.exe cargo test --test smoke -- --ignored
//! ```

mod common;

use std::time::Duration;

use anyhow::Context;
use rust_switcher_e2e::{By, Session, DEFAULT_WAIT_TIMEOUT};

#[test]
#[ignore = "requires WinAppDriver and RUST_SWITCHER_EXE"]
fn smoke_main_window_and_controls() -> anyhow::Result<()> {
    common::init_tracing();

    let session = Session::from_env().context("creating WinAppDriver session")?;

    // App startup can be slow on a cold machine; give the window extra room.
    let main_window = session.wait_visible(&By::name("RustSwitcher"), Duration::from_secs(60))?;
    assert!(main_window.is_displayed()?);

    let delay_input = session.wait_visible(&By::accessibility_id("1003"), DEFAULT_WAIT_TIMEOUT)?;
    let apply_button = session.wait_visible(&By::name("Apply"), DEFAULT_WAIT_TIMEOUT)?;
    let autoconvert_label =
        session.wait_visible(&By::name("Autoconvert pause:"), DEFAULT_WAIT_TIMEOUT)?;

    assert!(delay_input.is_displayed()?);
    assert!(apply_button.is_displayed()?);
    assert!(autoconvert_label.is_displayed()?);

    let before = delay_input.text_value()?;
    delay_input.set_text("250")?;

    // The new value travels over the protocol; poll instead of assuming a
    // synchronous read-back.
    let after = delay_input.wait_value_changed(&before, Duration::from_secs(10))?;
    assert_ne!(before, after);

    let cancel_button = session.wait_visible(&By::name("Cancel"), DEFAULT_WAIT_TIMEOUT)?;
    cancel_button.click()?;

    // Dropping the session closes the app and ends the WinAppDriver session.
    Ok(())
}
