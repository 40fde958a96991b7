//! `hidapi`-backed feature report transport.
//!
//! hidapi takes the report number as the first byte of the buffer. For this
//! protocol that byte is the length code the codec already writes, so
//! reports pass through unchanged.
//!
//! hidapi's feature report calls block in the OS HID driver and take no
//! timeout; the timeout argument is accepted and ignored. The OS driver
//! stays bound throughout, so there is nothing to detach or reattach.

use crate::error::{Error, Result};
use crate::transport::{FeatureTransport, INTERFACE};
use crate::HOLTEK_VID;
use hidapi::{HidApi, HidDevice};
use std::time::Duration;
use tracing::{debug, info};

/// Feature report access to one mouse's configuration interface.
pub struct HidFeatureTransport {
    device: HidDevice,
    interface: u8,
}

impl HidFeatureTransport {
    /// Open the configuration interface of the first Holtek device with
    /// product ID `pid`.
    pub fn open(pid: u16) -> Result<Self> {
        let api = HidApi::new()?;
        let info = api
            .device_list()
            .find(|d| {
                d.vendor_id() == HOLTEK_VID
                    && d.product_id() == pid
                    && d.interface_number() == INTERFACE as i32
            })
            .ok_or_else(|| {
                Error::DeviceNotFound(format!(
                    "no interface {INTERFACE} on {HOLTEK_VID:04x}:{pid:04x}"
                ))
            })?;

        info!(
            vid = format_args!("0x{:04X}", info.vendor_id()),
            pid = format_args!("0x{:04X}", info.product_id()),
            path = %info.path().to_string_lossy(),
            "Opening mouse configuration interface"
        );
        let device = api.open_path(info.path())?;
        debug!(
            timeout_ms = crate::transport::TIMEOUT.as_millis() as u64,
            "feature report calls block; timeout not enforced by hidapi"
        );
        Ok(Self {
            device,
            interface: INTERFACE,
        })
    }

    fn check_interface(&self, interface: u8) -> Result<()> {
        if interface != self.interface {
            return Err(Error::Hid(format!(
                "interface {interface} requested, handle is bound to {}",
                self.interface
            )));
        }
        Ok(())
    }
}

impl FeatureTransport for HidFeatureTransport {
    fn send_feature(
        &mut self,
        report_id: u16,
        interface: u8,
        payload: &[u8],
        _timeout: Duration,
    ) -> Result<usize> {
        self.check_interface(interface)?;
        let report_number = (report_id & 0xFF) as u8;
        if payload.first() != Some(&report_number) {
            return Err(Error::Hid(format!(
                "payload does not start with report number 0x{report_number:02X}"
            )));
        }
        self.device.send_feature_report(payload)?;
        Ok(payload.len())
    }

    fn recv_feature(
        &mut self,
        report_id: u16,
        interface: u8,
        len: usize,
        _timeout: Duration,
    ) -> Result<Vec<u8>> {
        self.check_interface(interface)?;
        let mut buf = vec![0u8; len];
        if let Some(first) = buf.first_mut() {
            *first = (report_id & 0xFF) as u8;
        }
        let n = self.device.get_feature_report(&mut buf)?;
        debug!(report_id = format_args!("0x{report_id:04X}"), n, "feature report read");
        buf.truncate(n);
        Ok(buf)
    }
}
