//! holtek-mouse-core: memory protocol, address tables, and configuration
//! for Holtek-chipset gaming mice.
//!
//! The device exposes its configuration as a flat memory addressed by
//! `(offset, page)`. Settings are read and written with a small instruction
//! set (seek, write, lock) carried in 16- and 64-byte HID feature reports.

pub mod address;
pub mod buttons;
pub mod config;
pub mod device;
pub mod dpi;
pub mod error;
pub mod hid;
pub mod lighting;
pub mod mouse;
pub mod profile;
pub mod report;
pub mod report_rate;
pub mod safety;
pub mod scroll;
pub mod session;
pub mod transport;

/// Holtek USB Vendor ID.
pub const HOLTEK_VID: u16 = 0x04D9;

/// Known product IDs.
pub mod pids {
    /// Redragon M811 Aatrox.
    pub const M811_AATROX: u16 = 0xFC6D;
}
