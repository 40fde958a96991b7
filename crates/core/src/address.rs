//! Fixed memory address tables.
//!
//! Device configuration memory is addressed by `(offset, page)`. Global
//! settings live at single addresses; per-profile settings are indexed by
//! profile, and key bindings by profile and button slot.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of independently configurable profiles.
pub const PROFILE_COUNT: usize = 5;

/// Number of key binding slots per profile.
pub const KEYMAP_LEN: usize = 20;

/// Start of one read or write in device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryAddress {
    pub offset: u8,
    pub page: u8,
}

impl MemoryAddress {
    pub const fn new(offset: u8, page: u8) -> Self {
        Self { offset, page }
    }

    /// Address `delta` bytes further into the same page.
    pub(crate) fn advance(self, delta: u8) -> Result<Self> {
        let offset = self
            .offset
            .checked_add(delta)
            .ok_or_else(|| Error::invalid_value("address offset", format!("{self} + {delta}")))?;
        Ok(Self { offset, ..self })
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}@{}", self.offset, self.page)
    }
}

/// A validated profile index in `0..PROFILE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Profile(u8);

impl Profile {
    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) < PROFILE_COUNT {
            Ok(Self(index))
        } else {
            Err(Error::InvalidProfile(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// All profiles in order.
    pub fn all() -> impl Iterator<Item = Profile> {
        (0..PROFILE_COUNT as u8).map(Profile)
    }
}

impl TryFrom<u8> for Profile {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl From<Profile> for u8 {
    fn from(p: Profile) -> u8 {
        p.0
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const fn a(offset: u8, page: u8) -> MemoryAddress {
    MemoryAddress::new(offset, page)
}

/// Scroll speed steps.
pub const SCROLL: MemoryAddress = a(0x20, 0);
/// Currently active profile.
pub const ACTIVE_PROFILE: MemoryAddress = a(0x2c, 0);
/// Poll rate steps.
pub const POLL_RATE: MemoryAddress = a(0x32, 0);

/// Start of each profile's 32-byte DPI block.
pub const DPIS: [MemoryAddress; PROFILE_COUNT] =
    [a(0x42, 0), a(0x02, 1), a(0xb2, 1), a(0x62, 2), a(0x12, 3)];

/// Lighting effect record of each profile.
pub const EFFECTS: [MemoryAddress; PROFILE_COUNT] =
    [a(0x49, 4), a(0x51, 4), a(0x59, 4), a(0x61, 4), a(0x69, 4)];

/// Key binding slots of each profile, in button order.
///
/// Slots 18 and 19 are not contiguous with the rest of their row.
#[rustfmt::skip]
pub const KEYMAPS: [[MemoryAddress; KEYMAP_LEN]; PROFILE_COUNT] = [
    [
        a(0x82, 0), a(0x86, 0), a(0x8a, 0), a(0x8e, 0), a(0x92, 0),
        a(0x96, 0), a(0x9a, 0), a(0x9e, 0), a(0xa2, 0), a(0xa6, 0),
        a(0xaa, 0), a(0xae, 0), a(0xb2, 0), a(0xb6, 0), a(0xba, 0),
        a(0xbe, 0), a(0xc2, 0), a(0xc6, 0), a(0xda, 0), a(0xde, 0),
    ],
    [
        a(0x42, 1), a(0x46, 1), a(0x4a, 1), a(0x4e, 1), a(0x52, 1),
        a(0x56, 1), a(0x5a, 1), a(0x5e, 1), a(0x62, 1), a(0x66, 1),
        a(0x6a, 1), a(0x6e, 1), a(0x72, 1), a(0x76, 1), a(0x7a, 1),
        a(0x7e, 1), a(0x82, 1), a(0x86, 1), a(0x9a, 1), a(0x9e, 1),
    ],
    [
        a(0xf2, 1), a(0xf6, 1), a(0xfa, 1), a(0xfe, 1), a(0x02, 2),
        a(0x06, 2), a(0x0a, 2), a(0x0e, 2), a(0x12, 2), a(0x16, 2),
        a(0x1a, 2), a(0x1e, 2), a(0x22, 2), a(0x26, 2), a(0x2a, 2),
        a(0x2e, 2), a(0x32, 2), a(0x36, 2), a(0x4a, 2), a(0x4e, 2),
    ],
    [
        a(0xa2, 2), a(0xa6, 2), a(0xaa, 2), a(0xae, 2), a(0xb2, 2),
        a(0xb6, 2), a(0xba, 2), a(0xbe, 2), a(0xc2, 2), a(0xc6, 2),
        a(0xca, 2), a(0xce, 2), a(0xd2, 2), a(0xd6, 2), a(0xda, 2),
        a(0xde, 2), a(0xe2, 2), a(0xe6, 2), a(0xfa, 2), a(0xfe, 2),
    ],
    [
        a(0x52, 3), a(0x56, 3), a(0x5a, 3), a(0x5e, 3), a(0x62, 3),
        a(0x66, 3), a(0x6a, 3), a(0x6e, 3), a(0x72, 3), a(0x76, 3),
        a(0x7a, 3), a(0x7e, 3), a(0x82, 3), a(0x86, 3), a(0x8a, 3),
        a(0x8e, 3), a(0x92, 3), a(0x96, 3), a(0xaa, 3), a(0xae, 3),
    ],
];

pub fn dpi_block(profile: Profile) -> MemoryAddress {
    DPIS[profile.index() as usize]
}

pub fn effects(profile: Profile) -> MemoryAddress {
    EFFECTS[profile.index() as usize]
}

/// Key binding slot `slot` of `profile`.
pub fn keymap_slot(profile: Profile, slot: usize) -> Result<MemoryAddress> {
    KEYMAPS[profile.index() as usize]
        .get(slot)
        .copied()
        .ok_or_else(|| Error::InvalidButton(format!("slot {slot}")))
}
