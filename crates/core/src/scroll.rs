//! Scroll speed read/write.
//!
//! Same five-step `(value, 0)` layout as the poll rate table, at its own
//! global address. Values are passed through unchanged.

use crate::address;
use crate::error::Result;
use crate::report::ReportSize;
use crate::report_rate::{decode_steps, encode_steps, STEP_COUNT, STEP_TABLE_LEN};
use crate::session;
use crate::transport::FeatureTransport;

/// Read the scroll speed of each step.
pub fn read_scroll_speeds(transport: &mut dyn FeatureTransport) -> Result<[u8; STEP_COUNT]> {
    let data = session::scoped(transport, |s| {
        s.read(ReportSize::Long, address::SCROLL, STEP_TABLE_LEN)
    })?;
    decode_steps(&data)
}

/// Write the scroll speed of each step.
pub fn write_scroll_speeds(
    transport: &mut dyn FeatureTransport,
    speeds: &[u8; STEP_COUNT],
) -> Result<()> {
    let data = encode_steps(speeds);
    session::scoped(transport, |s| {
        s.write(ReportSize::Long, address::SCROLL, &data)
    })
}
