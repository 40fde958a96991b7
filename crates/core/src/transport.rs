//! Feature report transport abstraction.
//!
//! The engine only needs to push a report to the device and pull one back.
//! Real devices (see [`crate::hid`]) and simulated devices share this trait.

use crate::error::{Error, Result};
use crate::report::ReportSize;
use std::time::Duration;
use tracing::trace;

/// HID interface carrying the configuration feature reports.
pub const INTERFACE: u8 = 2;

/// Per-transfer timeout passed to every [`FeatureTransport`] call.
///
/// Advisory: the `hidapi` backend ([`crate::hid`]) has no timed feature
/// report calls and blocks until the OS driver returns.
pub const TIMEOUT: Duration = Duration::from_millis(1000);

/// Host↔device feature report transfers.
///
/// Methods take `&mut self`: one handle serves one caller at a time, since
/// interleaved unlock/lock pairs from two callers would corrupt each
/// other's sessions.
pub trait FeatureTransport: Send {
    /// Send `payload` as feature report `report_id`. Returns bytes written.
    fn send_feature(
        &mut self,
        report_id: u16,
        interface: u8,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<usize>;

    /// Read `len` bytes of feature report `report_id`.
    fn recv_feature(
        &mut self,
        report_id: u16,
        interface: u8,
        len: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>>;
}

/// Send a fully framed report, checking the whole report was accepted.
pub fn set_report(transport: &mut dyn FeatureTransport, size: ReportSize, report: &[u8]) -> Result<()> {
    trace!(
        report_id = format_args!("0x{:04X}", size.report_id()),
        report_hex = format_args!("{:02X?}", report),
        "TX"
    );
    let written = transport.send_feature(size.report_id(), INTERFACE, report, TIMEOUT)?;
    if written != size.len() {
        return Err(Error::TransferLengthMismatch {
            expected: size.len(),
            actual: written,
        });
    }
    Ok(())
}

/// Read one raw report, checking its length.
pub fn get_report(transport: &mut dyn FeatureTransport, size: ReportSize) -> Result<Vec<u8>> {
    let raw = transport.recv_feature(size.report_id(), INTERFACE, size.len(), TIMEOUT)?;
    trace!(
        report_id = format_args!("0x{:04X}", size.report_id()),
        report_hex = format_args!("{:02X?}", raw),
        "RX"
    );
    if raw.len() != size.len() {
        return Err(Error::TransferLengthMismatch {
            expected: size.len(),
            actual: raw.len(),
        });
    }
    Ok(raw)
}
