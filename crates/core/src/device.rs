//! Known mouse models and enumeration of connected ones.
//!
//! Holtek-based mice expose several HID interfaces; only the configuration
//! interface ([`INTERFACE`]) carries the feature reports, so enumeration
//! reports one entry per physical mouse.

use crate::buttons::ButtonLayout;
use crate::error::Result;
use crate::transport::INTERFACE;
use crate::{pids, HOLTEK_VID};
use hidapi::{DeviceInfo as HidDeviceInfo, HidApi};
use tracing::{debug, info};

/// Mouse models with a known button layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseModel {
    M811Aatrox,
}

impl MouseModel {
    pub const ALL: &'static [MouseModel] = &[MouseModel::M811Aatrox];

    pub fn from_pid(pid: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.pid() == pid)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::M811Aatrox => "Redragon M811 Aatrox",
        }
    }

    pub fn pid(self) -> u16 {
        match self {
            Self::M811Aatrox => pids::M811_AATROX,
        }
    }

    /// Button names in binding slot order.
    pub fn button_layout(self) -> ButtonLayout {
        match self {
            Self::M811Aatrox => ButtonLayout::m811(),
        }
    }
}

/// A connected mouse, as seen on its configuration interface.
#[derive(Debug, Clone)]
pub struct ConnectedMouse {
    pub model: MouseModel,
    pub pid: u16,
    /// OS device path of the configuration interface.
    pub path: String,
    pub product: Option<String>,
    pub serial: Option<String>,
}

fn is_config_interface(vid: u16, interface: i32) -> bool {
    vid == HOLTEK_VID && interface == INTERFACE as i32
}

fn describe(info: &HidDeviceInfo) -> Option<ConnectedMouse> {
    if !is_config_interface(info.vendor_id(), info.interface_number()) {
        return None;
    }
    let model = MouseModel::from_pid(info.product_id())?;
    Some(ConnectedMouse {
        model,
        pid: info.product_id(),
        path: info.path().to_string_lossy().into_owned(),
        product: info.product_string().map(str::to_owned),
        serial: info.serial_number().map(str::to_owned),
    })
}

/// List connected mice of known models.
pub fn discover_devices() -> Result<Vec<ConnectedMouse>> {
    let api = HidApi::new()?;
    let mice: Vec<ConnectedMouse> = api.device_list().filter_map(describe).collect();

    for m in &mice {
        info!(
            model = m.model.name(),
            pid = format_args!("0x{:04X}", m.pid),
            path = %m.path,
            "found mouse"
        );
    }
    debug!(count = mice.len(), "enumeration done");
    Ok(mice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn m811_is_known_by_pid() {
        assert_eq!(MouseModel::from_pid(0xFC6D), Some(MouseModel::M811Aatrox));
        assert_eq!(MouseModel::from_pid(0xFC6E), None);
    }

    #[test]
    fn every_model_roundtrips_and_fits_keymap() {
        for &model in MouseModel::ALL {
            assert_eq!(MouseModel::from_pid(model.pid()), Some(model));
            assert!(model.button_layout().len() <= crate::address::KEYMAP_LEN);
        }
    }

    #[test]
    fn only_holtek_interface_two_is_config() {
        assert!(is_config_interface(0x04D9, 2));
        assert!(!is_config_interface(0x04D9, 0));
        assert!(!is_config_interface(0x046D, 2));
    }
}
