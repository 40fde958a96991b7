//! Per-profile lighting effect record.
//!
//! Seven bytes at the profile's effect address, through a 16-byte report:
//! red, green, blue, mode (low byte), speed, mode (high byte), brightness.

use crate::address::{self, Profile};
use crate::error::{Error, Result};
use crate::report::ReportSize;
use crate::session;
use crate::transport::FeatureTransport;
use serde::{Deserialize, Serialize};

/// Bytes in one effect record.
pub const EFFECT_LEN: u8 = 7;

/// One profile's lighting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectRecord {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub mode_low: u8,
    pub speed: u8,
    pub mode_high: u8,
    pub brightness: u8,
}

impl EffectRecord {
    /// Constant colour with no animation.
    pub fn solid(red: u8, green: u8, blue: u8, brightness: u8) -> Self {
        Self {
            red,
            green,
            blue,
            brightness,
            ..Self::default()
        }
    }

    pub fn to_bytes(self) -> [u8; EFFECT_LEN as usize] {
        [
            self.red,
            self.green,
            self.blue,
            self.mode_low,
            self.speed,
            self.mode_high,
            self.brightness,
        ]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match *bytes {
            [red, green, blue, mode_low, speed, mode_high, brightness, ..] => Ok(Self {
                red,
                green,
                blue,
                mode_low,
                speed,
                mode_high,
                brightness,
            }),
            _ => Err(Error::ShortResponse { len: bytes.len() }),
        }
    }

    /// 16-bit light mode assembled from its two bytes.
    pub fn mode(&self) -> u16 {
        u16::from_le_bytes([self.mode_low, self.mode_high])
    }
}

/// Read a profile's effect record.
pub fn read_effects(transport: &mut dyn FeatureTransport, profile: Profile) -> Result<EffectRecord> {
    let addr = address::effects(profile);
    let data = session::scoped(transport, |s| s.read(ReportSize::Short, addr, EFFECT_LEN))?;
    EffectRecord::from_bytes(&data)
}

/// Write a profile's effect record.
pub fn write_effects(
    transport: &mut dyn FeatureTransport,
    profile: Profile,
    effects: &EffectRecord,
) -> Result<()> {
    let addr = address::effects(profile);
    let data = effects.to_bytes();
    session::scoped(transport, |s| s.write(ReportSize::Short, addr, &data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::SimulatedMouse;

    #[test]
    fn red_record_roundtrips_on_profile_zero() {
        let mut mock = SimulatedMouse::new();
        let p0 = Profile::new(0).unwrap();
        let red = EffectRecord::solid(255, 0, 0, 7);

        write_effects(&mut mock, p0, &red).unwrap();
        assert_eq!(mock.peek(address::effects(p0), 7), &[255, 0, 0, 0, 0, 0, 7]);
        assert_eq!(read_effects(&mut mock, p0).unwrap(), red);
    }

    #[test]
    fn profiles_use_separate_records() {
        let mut mock = SimulatedMouse::new();
        let p1 = Profile::new(1).unwrap();
        let p2 = Profile::new(2).unwrap();
        write_effects(&mut mock, p1, &EffectRecord::solid(0, 0, 255, 1)).unwrap();
        assert_eq!(read_effects(&mut mock, p2).unwrap(), EffectRecord::default());
    }

    #[test]
    fn truncated_response_fails_and_relocks() {
        let mut mock = SimulatedMouse::new().short_reads();
        let result = read_effects(&mut mock, Profile::new(0).unwrap());
        assert!(matches!(
            result,
            Err(Error::TransferLengthMismatch { expected: 16, .. })
        ));
        assert!(mock.is_locked());
        assert_eq!(mock.lock_events(), vec![0, 1]);
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        assert!(EffectRecord::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn mode_combines_low_and_high() {
        let rec = EffectRecord {
            mode_low: 0x02,
            mode_high: 0x01,
            ..EffectRecord::default()
        };
        assert_eq!(rec.mode(), 0x0102);
    }
}
