//! Owned device handle with the full accessor set.
//!
//! Profile arguments are plain indices here and are validated before any
//! transfer. Every accessor takes `&mut self`, so one handle serves one
//! caller at a time; share it across threads behind a `Mutex`.

use crate::address::Profile;
use crate::buttons::{self, ButtonLayout, KeyBinding};
use crate::dpi::{self, DpiLevels, DpiSlot};
use crate::error::Result;
use crate::lighting::{self, EffectRecord};
use crate::profile;
use crate::report_rate::{self, PollInterval, STEP_COUNT};
use crate::scroll;
use crate::transport::FeatureTransport;

/// A mouse reachable through `T`, with its model's button layout.
pub struct Mouse<T: FeatureTransport> {
    transport: T,
    layout: ButtonLayout,
}

impl<T: FeatureTransport> Mouse<T> {
    pub fn new(transport: T, layout: ButtonLayout) -> Self {
        Self { transport, layout }
    }

    pub fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn active_profile(&mut self) -> Result<Profile> {
        profile::read_active_profile(&mut self.transport)
    }

    pub fn set_active_profile(&mut self, index: u8) -> Result<()> {
        let p = Profile::new(index)?;
        profile::write_active_profile(&mut self.transport, p)
    }

    pub fn poll_rates(&mut self) -> Result<[PollInterval; STEP_COUNT]> {
        report_rate::read_poll_rates(&mut self.transport)
    }

    pub fn set_poll_rates(&mut self, rates: &[PollInterval; STEP_COUNT]) -> Result<()> {
        report_rate::write_poll_rates(&mut self.transport, rates)
    }

    pub fn scroll_speeds(&mut self) -> Result<[u8; STEP_COUNT]> {
        scroll::read_scroll_speeds(&mut self.transport)
    }

    pub fn set_scroll_speeds(&mut self, speeds: &[u8; STEP_COUNT]) -> Result<()> {
        scroll::write_scroll_speeds(&mut self.transport, speeds)
    }

    pub fn effects(&mut self, index: u8) -> Result<EffectRecord> {
        let p = Profile::new(index)?;
        lighting::read_effects(&mut self.transport, p)
    }

    pub fn set_effects(&mut self, index: u8, effects: &EffectRecord) -> Result<()> {
        let p = Profile::new(index)?;
        lighting::write_effects(&mut self.transport, p, effects)
    }

    /// Bindings of every button in the layout, paired with button names.
    pub fn keymap(&mut self, index: u8) -> Result<Vec<(String, KeyBinding)>> {
        let p = Profile::new(index)?;
        let bindings = buttons::read_keymap(&mut self.transport, &self.layout, p)?;
        Ok(self.layout.names().iter().cloned().zip(bindings).collect())
    }

    pub fn set_keymap(&mut self, index: u8, bindings: &[KeyBinding]) -> Result<()> {
        let p = Profile::new(index)?;
        buttons::write_keymap(&mut self.transport, &self.layout, p, bindings)
    }

    pub fn binding(&mut self, index: u8, button: &str) -> Result<KeyBinding> {
        let p = Profile::new(index)?;
        buttons::read_binding(&mut self.transport, &self.layout, p, button)
    }

    pub fn map_key(&mut self, index: u8, button: &str, binding: KeyBinding) -> Result<()> {
        let p = Profile::new(index)?;
        buttons::map_key(&mut self.transport, &self.layout, p, button, binding)
    }

    pub fn map_keys(&mut self, index: u8, bindings: &[(&str, KeyBinding)]) -> Result<()> {
        let p = Profile::new(index)?;
        buttons::write_bindings(&mut self.transport, &self.layout, p, bindings)
    }

    pub fn dpis(&mut self, index: u8) -> Result<DpiLevels> {
        let p = Profile::new(index)?;
        dpi::read_dpis(&mut self.transport, p)
    }

    pub fn set_dpis(&mut self, index: u8, levels: &[u16]) -> Result<()> {
        let p = Profile::new(index)?;
        dpi::write_dpis(&mut self.transport, p, levels)
    }

    /// Write DPI slots by position; slots past `slots.len()` are disabled.
    pub fn set_dpi_slots(&mut self, index: u8, slots: &[DpiSlot]) -> Result<()> {
        let p = Profile::new(index)?;
        let dpis = DpiLevels::from_slots(slots)?;
        dpi::write_dpi_slots(&mut self.transport, p, &dpis)
    }
}
