//! Declarative mouse configuration, loaded from JSON.
//!
//! A [`MouseConfig`] lists only what should change; absent fields are left
//! as the device has them. Everything is validated before the first
//! transfer of [`MouseConfig::apply`].

use crate::address::Profile;
use crate::buttons::{ButtonLayout, KeyBinding};
use crate::dpi::DpiSlot;
use crate::error::{Error, Result};
use crate::lighting::EffectRecord;
use crate::mouse::Mouse;
use crate::report_rate::{PollInterval, STEP_COUNT};
use crate::safety;
use crate::transport::FeatureTransport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Settings to apply to a mouse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_rates: Option<[PollInterval; STEP_COUNT]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_speeds: Option<[u8; STEP_COUNT]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileConfig>,
}

/// Settings of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub profile: Profile,
    /// DPI slots by position, at most five. Missing trailing slots are
    /// written disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpis: Option<Vec<DpiSlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectRecord>,
    /// Bindings by button name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keymap: BTreeMap<String, KeyBinding>,
}

impl ProfileConfig {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            dpis: None,
            effects: None,
            keymap: BTreeMap::new(),
        }
    }
}

impl MouseConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every value against the safety limits and `layout`.
    pub fn validate(&self, layout: &ButtonLayout) -> Result<()> {
        for pc in &self.profiles {
            if let Some(dpis) = &pc.dpis {
                safety::validate_dpi_count(dpis.len())?;
            }
            for name in pc.keymap.keys() {
                layout.slot_of(name)?;
            }
        }
        Ok(())
    }

    /// Write the configuration to the device.
    ///
    /// Each attribute is its own locked session. If a transfer fails, the
    /// attributes already written stay written.
    pub fn apply<T: FeatureTransport>(&self, mouse: &mut Mouse<T>) -> Result<()> {
        self.validate(mouse.layout())?;

        if let Some(rates) = &self.poll_rates {
            mouse.set_poll_rates(rates)?;
        }
        if let Some(speeds) = &self.scroll_speeds {
            mouse.set_scroll_speeds(speeds)?;
        }
        for pc in &self.profiles {
            let index = pc.profile.index();
            if let Some(dpis) = &pc.dpis {
                mouse.set_dpi_slots(index, dpis)?;
            }
            if let Some(effects) = &pc.effects {
                mouse.set_effects(index, effects)?;
            }
            if !pc.keymap.is_empty() {
                let bindings: Vec<(&str, KeyBinding)> =
                    pc.keymap.iter().map(|(k, v)| (k.as_str(), *v)).collect();
                mouse.map_keys(index, &bindings)?;
            }
            info!(profile = index, "profile applied");
        }
        if let Some(active) = self.active_profile {
            mouse.set_active_profile(active.index())?;
        }
        Ok(())
    }

    /// Read the device's full configuration.
    pub fn snapshot<T: FeatureTransport>(mouse: &mut Mouse<T>) -> Result<Self> {
        let mut profiles = Vec::new();
        for p in Profile::all() {
            let index = p.index();
            profiles.push(ProfileConfig {
                profile: p,
                dpis: Some(mouse.dpis(index)?.slots().to_vec()),
                effects: Some(mouse.effects(index)?),
                keymap: mouse.keymap(index)?.into_iter().collect(),
            });
        }

        Ok(Self {
            active_profile: Some(mouse.active_profile()?),
            poll_rates: Some(mouse.poll_rates()?),
            scroll_speeds: Some(mouse.scroll_speeds()?),
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{actions, modifiers};

    const SAMPLE: &str = r#"{
        "poll_rates": [1, 1, 1, 1, 1],
        "profiles": [
            {
                "profile": 0,
                "dpis": [
                    {"enabled": true, "level": 9},
                    {"enabled": false, "level": 18},
                    {"enabled": true, "level": 27}
                ],
                "effects": {"red": 0, "green": 0, "blue": 255, "mode_low": 0,
                            "speed": 0, "mode_high": 0, "brightness": 1},
                "keymap": {
                    "left": {"action": 129, "modifier": 0, "key": 0},
                    "num1": {"action": 143, "modifier": 1, "key": 9}
                }
            }
        ]
    }"#;

    #[test]
    fn parse_sample() {
        let cfg = MouseConfig::from_json(SAMPLE).unwrap();
        assert_eq!(cfg.poll_rates, Some([PollInterval::Ms1; STEP_COUNT]));
        assert_eq!(cfg.scroll_speeds, None);
        let p0 = &cfg.profiles[0];
        assert_eq!(p0.profile.index(), 0);
        let dpis = p0.dpis.as_deref().unwrap();
        assert_eq!(dpis.len(), 3);
        assert_eq!(dpis[1], DpiSlot { enabled: false, level: 18 });
        assert_eq!(dpis[2], DpiSlot::enabled(27));
        assert_eq!(p0.keymap["left"], KeyBinding::action(actions::LEFT_CLICK));
        assert_eq!(p0.keymap["num1"], KeyBinding::combo(modifiers::CTRL, 0x09));
    }

    #[test]
    fn parse_rejects_bad_poll_rate() {
        let err = MouseConfig::from_json(r#"{"poll_rates": [1, 1, 3, 1, 1]}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn parse_rejects_bad_profile() {
        assert!(MouseConfig::from_json(r#"{"profiles": [{"profile": 5}]}"#).is_err());
    }

    #[test]
    fn validate_rejects_unknown_button() {
        let cfg = MouseConfig::from_json(
            r#"{"profiles": [{"profile": 1, "keymap": {"num12": {"action": 144, "modifier": 0, "key": 30}}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            cfg.validate(&ButtonLayout::m811()),
            Err(Error::InvalidButton(_))
        ));
        assert!(cfg.validate(&ButtonLayout::generic()).is_err());
    }

    #[test]
    fn validate_rejects_too_many_dpis() {
        let mut p0 = ProfileConfig::new(Profile::new(0).unwrap());
        p0.dpis = Some(vec![DpiSlot::enabled(9); 6]);
        let cfg = MouseConfig {
            profiles: vec![p0],
            ..MouseConfig::default()
        };
        assert!(cfg.validate(&ButtonLayout::m811()).is_err());
    }

    #[test]
    fn empty_config_serializes_to_empty_object() {
        assert_eq!(MouseConfig::default().to_json_pretty().unwrap(), "{}");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MouseConfig::load(Path::new("/nonexistent/mouse.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
