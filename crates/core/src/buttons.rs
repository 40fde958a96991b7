//! Per-button key bindings.
//!
//! Every profile has 20 binding slots, each 4 bytes read and written
//! through a 16-byte report: `(action, modifier, key, 0)`. How many slots a
//! mouse actually uses, and what its buttons are called, depends on the
//! model; see [`ButtonLayout`].

use crate::address::{self, Profile, KEYMAP_LEN};
use crate::error::{Error, Result};
use crate::report::ReportSize;
use crate::safety;
use crate::session;
use crate::transport::FeatureTransport;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Bytes per binding slot.
const SLOT_LEN: u8 = 4;

/// Known action codes.
pub mod actions {
    pub const LEFT_CLICK: u8 = 0x81;
    pub const RIGHT_CLICK: u8 = 0x82;
    pub const MIDDLE_CLICK: u8 = 0x83;
    /// Cycle through the profile's DPI levels.
    pub const DPI_CYCLE: u8 = 0x88;
    /// Cycle through profiles.
    pub const PROFILE_CYCLE: u8 = 0x8d;
    /// Modifier + key.
    pub const KEY_COMBO: u8 = 0x8f;
    /// One key, no modifier.
    pub const SINGLE_KEY: u8 = 0x90;
}

/// Modifier bits, combinable.
pub mod modifiers {
    pub const CTRL: u8 = 0x01;
    pub const SHIFT: u8 = 0x02;
    pub const ALT: u8 = 0x04;
    pub const GUI: u8 = 0x08;
}

/// Raw binding stored in one slot. `key` is a USB HID usage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    pub action: u8,
    pub modifier: u8,
    pub key: u8,
}

impl KeyBinding {
    pub const fn new(action: u8, modifier: u8, key: u8) -> Self {
        Self {
            action,
            modifier,
            key,
        }
    }

    /// A mouse action without key payload.
    pub const fn action(action: u8) -> Self {
        Self::new(action, 0, 0)
    }

    pub const fn single_key(key: u8) -> Self {
        Self::new(actions::SINGLE_KEY, 0, key)
    }

    pub const fn combo(modifier: u8, key: u8) -> Self {
        Self::new(actions::KEY_COMBO, modifier, key)
    }

    fn to_bytes(self) -> [u8; SLOT_LEN as usize] {
        [self.action, self.modifier, self.key, 0]
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            actions::LEFT_CLICK => write!(f, "left click"),
            actions::RIGHT_CLICK => write!(f, "right click"),
            actions::MIDDLE_CLICK => write!(f, "middle click"),
            actions::DPI_CYCLE => write!(f, "DPI cycle"),
            actions::PROFILE_CYCLE => write!(f, "profile cycle"),
            actions::SINGLE_KEY => write!(f, "key 0x{:02x}", self.key),
            actions::KEY_COMBO => write!(f, "combo mod 0x{:02x} + key 0x{:02x}", self.modifier, self.key),
            other => write!(
                f,
                "action 0x{other:02x} (0x{:02x} 0x{:02x})",
                self.modifier, self.key
            ),
        }
    }
}

/// Button names of one mouse model, in binding slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLayout {
    names: Vec<String>,
}

impl ButtonLayout {
    /// Build a layout. Names are matched case-insensitively and must be
    /// unique; at most [`KEYMAP_LEN`] are allowed.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.into().to_lowercase()).collect();
        safety::validate_layout_len(names.len())?;
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::invalid_value("button_layout", format!("duplicate button '{name}'")));
            }
        }
        Ok(Self { names })
    }

    /// `button1`..`button20`, covering every slot.
    pub fn generic() -> Self {
        Self {
            names: (1..=KEYMAP_LEN).map(|i| format!("button{i}")).collect(),
        }
    }

    /// Redragon M811 Aatrox: 8 top buttons, then the 8 side keys.
    pub fn m811() -> Self {
        let top = [
            "left", "right", "middle", "button4", "button5", "dpi_up", "dpi_down", "mode",
        ];
        let side = (1..=8).map(|i| format!("num{i}"));
        Self {
            names: top.iter().map(|s| s.to_string()).chain(side).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Slot index of a named button.
    pub fn slot_of(&self, name: &str) -> Result<usize> {
        let wanted = name.to_lowercase();
        self.names
            .iter()
            .position(|n| *n == wanted)
            .ok_or_else(|| Error::InvalidButton(name.to_string()))
    }
}

/// Read every binding of the layout, in slot order.
pub fn read_keymap(
    transport: &mut dyn FeatureTransport,
    layout: &ButtonLayout,
    profile: Profile,
) -> Result<Vec<KeyBinding>> {
    let addrs = (0..layout.len())
        .map(|slot| address::keymap_slot(profile, slot))
        .collect::<Result<Vec<_>>>()?;

    session::scoped(transport, |s| {
        addrs
            .iter()
            .map(|&addr| -> Result<KeyBinding> {
                let data = s.read(ReportSize::Short, addr, SLOT_LEN)?;
                Ok(KeyBinding::from_bytes(&data))
            })
            .collect()
    })
}

/// Read the binding of one named button.
pub fn read_binding(
    transport: &mut dyn FeatureTransport,
    layout: &ButtonLayout,
    profile: Profile,
    button: &str,
) -> Result<KeyBinding> {
    let slot = layout.slot_of(button)?;
    let addr = address::keymap_slot(profile, slot)?;
    let data = session::scoped(transport, |s| s.read(ReportSize::Short, addr, SLOT_LEN))?;
    Ok(KeyBinding::from_bytes(&data))
}

/// Write bindings in slot order, starting at slot 0.
///
/// Slots past `bindings.len()` are left untouched. A transfer failure
/// partway leaves the earlier slots written.
pub fn write_keymap(
    transport: &mut dyn FeatureTransport,
    layout: &ButtonLayout,
    profile: Profile,
    bindings: &[KeyBinding],
) -> Result<()> {
    safety::validate_keymap_len(bindings.len(), layout.len())?;
    let writes = bindings
        .iter()
        .enumerate()
        .map(|(slot, b)| -> Result<_> { Ok((address::keymap_slot(profile, slot)?, *b)) })
        .collect::<Result<Vec<_>>>()?;
    write_slots(transport, profile, &writes)
}

/// Bind several named buttons in one session.
pub fn write_bindings(
    transport: &mut dyn FeatureTransport,
    layout: &ButtonLayout,
    profile: Profile,
    bindings: &[(&str, KeyBinding)],
) -> Result<()> {
    let writes = bindings
        .iter()
        .map(|&(name, b)| -> Result<_> {
            let slot = layout.slot_of(name)?;
            Ok((address::keymap_slot(profile, slot)?, b))
        })
        .collect::<Result<Vec<_>>>()?;
    write_slots(transport, profile, &writes)
}

/// Bind one named button.
pub fn map_key(
    transport: &mut dyn FeatureTransport,
    layout: &ButtonLayout,
    profile: Profile,
    button: &str,
    binding: KeyBinding,
) -> Result<()> {
    write_bindings(transport, layout, profile, &[(button, binding)])
}

fn write_slots(
    transport: &mut dyn FeatureTransport,
    profile: Profile,
    writes: &[(address::MemoryAddress, KeyBinding)],
) -> Result<()> {
    debug!(%profile, count = writes.len(), "writing key bindings");
    session::scoped(transport, |s| {
        for (addr, binding) in writes {
            s.write(ReportSize::Short, *addr, &binding.to_bytes())?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::MemoryAddress;
    use crate::transport::mock::SimulatedMouse;

    fn p0() -> Profile {
        Profile::new(0).unwrap()
    }

    #[test]
    fn m811_layout_order() {
        let layout = ButtonLayout::m811();
        assert_eq!(layout.len(), 16);
        assert_eq!(layout.slot_of("left").unwrap(), 0);
        assert_eq!(layout.slot_of("mode").unwrap(), 7);
        assert_eq!(layout.slot_of("num1").unwrap(), 8);
        assert_eq!(layout.slot_of("NUM8").unwrap(), 15);
    }

    #[test]
    fn unknown_button_rejected() {
        let layout = ButtonLayout::m811();
        assert!(matches!(layout.slot_of("num9"), Err(Error::InvalidButton(_))));
        assert_eq!(ButtonLayout::generic().slot_of("button20").unwrap(), 19);
    }

    #[test]
    fn layout_rejects_duplicates_and_oversize() {
        assert!(ButtonLayout::new(["a", "A"]).is_err());
        assert!(ButtonLayout::new((0..21).map(|i| i.to_string())).is_err());
        assert!(ButtonLayout::new(Vec::<String>::new()).is_err());
        assert_eq!(ButtonLayout::new(["x", "y"]).unwrap().len(), 2);
    }

    #[test]
    fn map_num1_then_read_back() {
        let mut mock = SimulatedMouse::new();
        let layout = ButtonLayout::m811();
        let ctrl_f = KeyBinding::combo(modifiers::CTRL, 0x09);

        map_key(&mut mock, &layout, p0(), "num1", ctrl_f).unwrap();

        // slot 8 of profile 0
        assert_eq!(mock.peek(MemoryAddress::new(0xa2, 0), 4), &[0x8f, 0x01, 0x09, 0x00]);
        let keymap = read_keymap(&mut mock, &layout, p0()).unwrap();
        assert_eq!(keymap.len(), 16);
        assert_eq!(keymap[8], ctrl_f);
        assert_eq!(read_binding(&mut mock, &layout, p0(), "num1").unwrap(), ctrl_f);
    }

    #[test]
    fn map_unknown_button_issues_no_transfer() {
        let mut mock = SimulatedMouse::new();
        let result = map_key(
            &mut mock,
            &ButtonLayout::m811(),
            p0(),
            "num12",
            KeyBinding::single_key(0x1e),
        );
        assert!(matches!(result, Err(Error::InvalidButton(_))));
        assert_eq!(mock.transfers(), 0);
    }

    #[test]
    fn write_keymap_in_slot_order() {
        let mut mock = SimulatedMouse::new();
        let layout = ButtonLayout::m811();
        let p1 = Profile::new(1).unwrap();
        let front = [
            KeyBinding::action(actions::LEFT_CLICK),
            KeyBinding::action(actions::RIGHT_CLICK),
            KeyBinding::action(actions::MIDDLE_CLICK),
            KeyBinding::single_key(0x2a),
        ];

        write_keymap(&mut mock, &layout, p1, &front).unwrap();

        let keymap = read_keymap(&mut mock, &layout, p1).unwrap();
        assert_eq!(&keymap[..4], &front);
        assert_eq!(keymap[4], KeyBinding::new(0, 0, 0));
    }

    #[test]
    fn write_keymap_longer_than_layout_rejected() {
        let mut mock = SimulatedMouse::new();
        let layout = ButtonLayout::new(["a", "b"]).unwrap();
        let result = write_keymap(&mut mock, &layout, p0(), &[KeyBinding::single_key(1); 3]);
        assert!(result.is_err());
        assert_eq!(mock.transfers(), 0);
    }

    #[test]
    fn read_keymap_uses_one_session() {
        let mut mock = SimulatedMouse::new();
        read_keymap(&mut mock, &ButtonLayout::m811(), p0()).unwrap();
        assert_eq!(mock.lock_events(), vec![0, 1]);
    }

    #[test]
    fn binding_display() {
        assert_eq!(KeyBinding::action(actions::LEFT_CLICK).to_string(), "left click");
        assert_eq!(KeyBinding::single_key(0x28).to_string(), "key 0x28");
        assert_eq!(
            KeyBinding::combo(modifiers::SHIFT, 0x25).to_string(),
            "combo mod 0x02 + key 0x25"
        );
    }
}
