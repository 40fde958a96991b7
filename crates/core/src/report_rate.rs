//! Poll rate read/write.
//!
//! The device keeps one poll rate per DPI step, five steps in total, at a
//! single global address. Each step is a `(value, 0)` byte pair, read and
//! written through a 64-byte report.
//!
//! Rate encoding: 1=1ms(1000Hz), 2=2ms(500Hz), 4=4ms(250Hz), 8=8ms(125Hz)

use crate::address;
use crate::error::{Error, Result};
use crate::report::ReportSize;
use crate::session;
use crate::transport::FeatureTransport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of steps in the poll rate and scroll speed tables.
pub const STEP_COUNT: usize = 5;

/// Bytes occupied by a five-step table.
pub(crate) const STEP_TABLE_LEN: u8 = (STEP_COUNT * 2) as u8;

/// Report interval, stored on the device as a divisor of 1000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PollInterval {
    Ms1 = 1,
    Ms2 = 2,
    Ms4 = 4,
    Ms8 = 8,
}

impl PollInterval {
    /// All intervals, fastest first.
    pub const ALL: &'static [PollInterval] = &[
        PollInterval::Ms1,
        PollInterval::Ms2,
        PollInterval::Ms4,
        PollInterval::Ms8,
    ];

    pub fn from_divisor(divisor: u8) -> Result<Self> {
        match divisor {
            1 => Ok(Self::Ms1),
            2 => Ok(Self::Ms2),
            4 => Ok(Self::Ms4),
            8 => Ok(Self::Ms8),
            other => Err(Error::invalid_value("poll_rate", other)),
        }
    }

    pub fn from_hz(hz: u16) -> Result<Self> {
        match hz {
            1000 => Ok(Self::Ms1),
            500 => Ok(Self::Ms2),
            250 => Ok(Self::Ms4),
            125 => Ok(Self::Ms8),
            other => Err(Error::invalid_value("poll_rate_hz", other)),
        }
    }

    pub fn divisor(self) -> u8 {
        self as u8
    }

    pub fn hz(self) -> u16 {
        1000 / self.divisor() as u16
    }
}

impl TryFrom<u8> for PollInterval {
    type Error = Error;

    fn try_from(divisor: u8) -> Result<Self> {
        Self::from_divisor(divisor)
    }
}

impl From<PollInterval> for u8 {
    fn from(p: PollInterval) -> u8 {
        p.divisor()
    }
}

impl std::fmt::Display for PollInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// Spread five step values into `(value, 0)` pairs.
pub(crate) fn encode_steps(values: &[u8; STEP_COUNT]) -> [u8; STEP_TABLE_LEN as usize] {
    let mut out = [0u8; STEP_TABLE_LEN as usize];
    for (i, &v) in values.iter().enumerate() {
        out[i * 2] = v;
    }
    out
}

/// Collect the value byte of each `(value, gap)` pair.
pub(crate) fn decode_steps(data: &[u8]) -> Result<[u8; STEP_COUNT]> {
    if data.len() < STEP_TABLE_LEN as usize {
        return Err(Error::ShortResponse { len: data.len() });
    }
    let mut out = [0u8; STEP_COUNT];
    for (i, v) in out.iter_mut().enumerate() {
        *v = data[i * 2];
    }
    Ok(out)
}

/// Read the poll rate of each step.
pub fn read_poll_rates(transport: &mut dyn FeatureTransport) -> Result<[PollInterval; STEP_COUNT]> {
    let data = session::scoped(transport, |s| {
        s.read(ReportSize::Long, address::POLL_RATE, STEP_TABLE_LEN)
    })?;

    let mut rates = [PollInterval::Ms1; STEP_COUNT];
    for (rate, divisor) in rates.iter_mut().zip(decode_steps(&data)?) {
        *rate = PollInterval::from_divisor(divisor)?;
    }
    Ok(rates)
}

/// Write the poll rate of each step.
pub fn write_poll_rates(
    transport: &mut dyn FeatureTransport,
    rates: &[PollInterval; STEP_COUNT],
) -> Result<()> {
    debug!(?rates, "writing poll rates");
    let divisors = rates.map(PollInterval::divisor);
    let data = encode_steps(&divisors);
    session::scoped(transport, |s| {
        s.write(ReportSize::Long, address::POLL_RATE, &data)
    })
}
