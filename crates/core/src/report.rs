//! Feature report framing for the Holtek memory protocol.
//!
//! Two report sizes share one layout:
//! - byte 0: length code (0x02 for 16-byte reports, 0x03 for 64-byte reports)
//! - byte 1: opcode
//! - bytes 2..: opcode arguments, zero padded
//!
//! The length code doubles as the HID report number, so the full feature
//! report ID on the wire is `0x0300 | length_code`.
//!
//! Responses echo the first 8 bytes of the last request; memory contents
//! start at byte 8.

use crate::address::MemoryAddress;
use crate::error::{Error, Result};

/// HID feature report type in the high byte of the report ID.
pub const FEATURE_REPORT: u16 = 0x0300;

/// Bytes echoed at the start of every response.
pub const RESPONSE_HEADER_LEN: usize = 8;

/// Opcode present in firmware with unknown function. Never sent.
pub const RESERVED_OPCODE: u8 = 0xF1;

/// Supported report sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSize {
    /// 16-byte report (report ID 0x0302).
    Short,
    /// 64-byte report (report ID 0x0303).
    Long,
}

impl ReportSize {
    pub fn len(self) -> usize {
        match self {
            Self::Short => 16,
            Self::Long => 64,
        }
    }

    pub fn length_code(self) -> u8 {
        match self {
            Self::Short => 0x02,
            Self::Long => 0x03,
        }
    }

    pub fn report_id(self) -> u16 {
        FEATURE_REPORT | self.length_code() as u16
    }

    /// Largest payload a read through this report can return.
    pub fn max_read(self) -> usize {
        self.len() - RESPONSE_HEADER_LEN
    }

    pub fn from_report_id(id: u16) -> Option<Self> {
        match id {
            0x0302 => Some(Self::Short),
            0x0303 => Some(Self::Long),
            _ => None,
        }
    }
}

/// Device instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Position the memory cursor and declare the transfer length.
    Seek = 0xF2,
    /// Seek, then store the trailing bytes.
    Write = 0xF3,
    /// Argument 0 unlocks configuration memory, 1 relocks it.
    Lock = 0xF5,
}

impl Opcode {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0xF2 => Some(Self::Seek),
            0xF3 => Some(Self::Write),
            0xF5 => Some(Self::Lock),
            _ => None,
        }
    }
}

/// Build a zero-padded report for `opcode` with `args`.
pub fn encode(size: ReportSize, opcode: Opcode, args: &[u8]) -> Result<Vec<u8>> {
    let capacity = size.len();
    if args.len() + 2 > capacity {
        return Err(Error::ArgumentsTooLong {
            len: args.len(),
            capacity,
        });
    }

    let mut buf = vec![0u8; capacity];
    buf[0] = size.length_code();
    buf[1] = opcode as u8;
    buf[2..2 + args.len()].copy_from_slice(args);
    Ok(buf)
}

/// Strip the echoed header from a response.
pub fn decode(raw: &[u8]) -> Result<&[u8]> {
    raw.get(RESPONSE_HEADER_LEN..)
        .ok_or(Error::ShortResponse { len: raw.len() })
}

/// Arguments of a `SEEK` announcing an `n`-byte read at `addr`.
pub fn seek_args(addr: MemoryAddress, n: u8) -> [u8; 3] {
    [addr.offset, addr.page, n]
}

/// Arguments of a `WRITE` storing `data` at `addr`.
///
/// The three reserved bytes keep `data` at report byte 8, so an echoed
/// response decodes back to exactly the written bytes.
pub fn write_args(addr: MemoryAddress, data: &[u8]) -> Result<Vec<u8>> {
    let n = u8::try_from(data.len()).map_err(|_| Error::ArgumentsTooLong {
        len: data.len(),
        capacity: u8::MAX as usize,
    })?;
    let mut args = Vec::with_capacity(6 + data.len());
    args.extend_from_slice(&[addr.offset, addr.page, n, 0, 0, 0]);
    args.extend_from_slice(data);
    Ok(args)
}

/// Arguments of a `LOCK` instruction.
pub fn lock_args(locked: bool) -> [u8; 1] {
    [locked as u8]
}
