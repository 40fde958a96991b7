//! Per-profile DPI levels.
//!
//! Each profile owns a 32-byte block: 2 unused bytes, then 5 slots of 6
//! bytes. A slot starts with `(enabled, level_lo, level_hi)`; the level is
//! a raw little-endian sensor code, not a DPI figure.
//!
//! The block is read in one 64-byte report. Slots are written one 16-byte
//! report at a time (4 bytes each), and every slot is written: slots past
//! the supplied levels are explicitly disabled so no stale level survives.

use crate::address::{self, Profile};
use crate::error::{Error, Result};
use crate::report::ReportSize;
use crate::safety::{self, MAX_DPI_LEVELS};
use crate::session;
use crate::transport::FeatureTransport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bytes in one profile's DPI block.
pub const DPI_BLOCK_LEN: u8 = 32;
/// Unused bytes before the first slot.
const SLOT_PREFIX: u8 = 2;
/// Distance between consecutive slots.
const SLOT_STRIDE: u8 = 6;
/// Bytes written per slot.
const SLOT_WRITE_LEN: usize = 4;

/// One DPI step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpiSlot {
    pub enabled: bool,
    pub level: u16,
}

impl DpiSlot {
    pub const DISABLED: DpiSlot = DpiSlot {
        enabled: false,
        level: 0,
    };

    pub fn enabled(level: u16) -> Self {
        Self {
            enabled: true,
            level,
        }
    }

    fn to_bytes(self) -> [u8; SLOT_WRITE_LEN] {
        let [lo, hi] = self.level.to_le_bytes();
        [self.enabled as u8, lo, hi, 0]
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            enabled: bytes[0] == 1,
            level: u16::from_le_bytes([bytes[1], bytes[2]]),
        }
    }
}

/// All five DPI steps of a profile, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiLevels(pub [DpiSlot; MAX_DPI_LEVELS]);

impl DpiLevels {
    /// `levels` enabled in order, remaining slots disabled.
    pub fn from_levels(levels: &[u16]) -> Result<Self> {
        safety::validate_dpi_count(levels.len())?;
        let mut slots = [DpiSlot::DISABLED; MAX_DPI_LEVELS];
        for (slot, &level) in slots.iter_mut().zip(levels) {
            *slot = DpiSlot::enabled(level);
        }
        Ok(Self(slots))
    }

    /// `slots` by position, remaining slots disabled.
    pub fn from_slots(slots: &[DpiSlot]) -> Result<Self> {
        safety::validate_dpi_count(slots.len())?;
        let mut out = [DpiSlot::DISABLED; MAX_DPI_LEVELS];
        out[..slots.len()].copy_from_slice(slots);
        Ok(Self(out))
    }

    /// Level codes of the enabled slots, in slot order.
    pub fn enabled_levels(&self) -> Vec<u16> {
        self.0
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.level)
            .collect()
    }

    pub fn slots(&self) -> &[DpiSlot; MAX_DPI_LEVELS] {
        &self.0
    }

    fn decode(block: &[u8]) -> Result<Self> {
        if block.len() < DPI_BLOCK_LEN as usize {
            return Err(Error::ShortResponse { len: block.len() });
        }
        let mut slots = [DpiSlot::DISABLED; MAX_DPI_LEVELS];
        for (i, slot) in slots.iter_mut().enumerate() {
            let start = (SLOT_PREFIX + SLOT_STRIDE * i as u8) as usize;
            *slot = DpiSlot::from_bytes(&block[start..start + 3]);
        }
        Ok(Self(slots))
    }
}

/// Read all five DPI slots of a profile.
pub fn read_dpis(transport: &mut dyn FeatureTransport, profile: Profile) -> Result<DpiLevels> {
    let addr = address::dpi_block(profile);
    let block = session::scoped(transport, |s| s.read(ReportSize::Long, addr, DPI_BLOCK_LEN))?;
    DpiLevels::decode(&block)
}

/// Write up to five enabled DPI levels; the rest are disabled.
pub fn write_dpis(transport: &mut dyn FeatureTransport, profile: Profile, levels: &[u16]) -> Result<()> {
    debug!(%profile, ?levels, "writing DPI levels");
    write_dpi_slots(transport, profile, &DpiLevels::from_levels(levels)?)
}

/// Write all five slots as given, disabled ones included with their level.
pub fn write_dpi_slots(transport: &mut dyn FeatureTransport, profile: Profile, dpis: &DpiLevels) -> Result<()> {
    let base = address::dpi_block(profile);

    // resolve every slot address before unlocking
    let mut writes = Vec::with_capacity(MAX_DPI_LEVELS);
    for (i, slot) in dpis.0.iter().enumerate() {
        let addr = base.advance(SLOT_PREFIX + SLOT_STRIDE * i as u8)?;
        writes.push((addr, slot.to_bytes()));
    }

    session::scoped(transport, |s| {
        for (addr, bytes) in &writes {
            s.write(ReportSize::Short, *addr, bytes)?;
        }
        Ok(())
    })
}
