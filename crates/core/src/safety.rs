//! Safety layer: validates write parameters before anything reaches the
//! device.
//!
//! Configuration memory has no transaction primitive, so a setter that
//! fails halfway leaves earlier writes in place. Everything that can be
//! checked up front is checked here, before the unlock is sent.
//!
//! ## Poll rate
//! - Stored as a divisor of 1000 Hz: 1, 2, 4 or 8 (1000/500/250/125 Hz)
//! - Five steps, one per DPI step
//!
//! ## DPI
//! - At most 5 enabled levels per profile
//! - Level codes are raw 16-bit values; unused slots are written disabled
//!
//! ## Key bindings
//! - At most 20 slots per profile; a model declares how many it uses
//! - Bindings are raw `(action, modifier, key)` bytes

use crate::address::KEYMAP_LEN;
use crate::error::{Error, Result};
use crate::report_rate::{PollInterval, STEP_COUNT};

/// Printed before any command that writes to the device.
pub const BRICKING_DISCLAIMER: &str = "\
WARNING: This software writes directly to your mouse's configuration memory. \
All values are checked before sending, but the device performs no validation \
of its own and a partially applied configuration is not rolled back. \
Use at your own risk.";

/// Maximum number of DPI levels per profile.
pub const MAX_DPI_LEVELS: usize = 5;

/// Validate five raw poll-rate divisors.
pub fn validate_poll_divisors(divisors: &[u8]) -> Result<[PollInterval; STEP_COUNT]> {
    let steps = validate_step_count("poll_rates", divisors)?;
    let mut rates = [PollInterval::Ms1; STEP_COUNT];
    for (rate, divisor) in rates.iter_mut().zip(steps) {
        *rate = PollInterval::from_divisor(divisor)?;
    }
    Ok(rates)
}

/// Validate that exactly one value per step was supplied.
pub fn validate_step_count(field: &'static str, values: &[u8]) -> Result<[u8; STEP_COUNT]> {
    values
        .try_into()
        .map_err(|_| Error::invalid_value(field, format!("{} steps (expected {STEP_COUNT})", values.len())))
}

/// Validate the number of DPI levels.
pub fn validate_dpi_count(count: usize) -> Result<()> {
    if count > MAX_DPI_LEVELS {
        return Err(Error::invalid_value(
            "dpi_levels",
            format!("{count} levels (at most {MAX_DPI_LEVELS})"),
        ));
    }
    Ok(())
}

/// Validate the number of buttons in a layout.
pub fn validate_layout_len(len: usize) -> Result<()> {
    if len == 0 || len > KEYMAP_LEN {
        return Err(Error::invalid_value(
            "button_layout",
            format!("{len} buttons (expected 1..={KEYMAP_LEN})"),
        ));
    }
    Ok(())
}

/// Validate a full keymap against the layout size.
pub fn validate_keymap_len(len: usize, layout_len: usize) -> Result<()> {
    if len > layout_len {
        return Err(Error::invalid_value(
            "keymap",
            format!("{len} bindings for {layout_len} buttons"),
        ));
    }
    Ok(())
}
