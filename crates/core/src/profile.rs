//! Active profile selection.
//!
//! A single byte at a global address holds the index of the profile the
//! mouse is currently using.

use crate::address::{self, Profile};
use crate::error::Result;
use crate::report::ReportSize;
use crate::session;
use crate::transport::FeatureTransport;
use tracing::debug;

/// Read the active profile.
pub fn read_active_profile(transport: &mut dyn FeatureTransport) -> Result<Profile> {
    let data = session::scoped(transport, |s| {
        s.read(ReportSize::Short, address::ACTIVE_PROFILE, 1)
    })?;
    Profile::new(data[0])
}

/// Switch the active profile.
pub fn write_active_profile(transport: &mut dyn FeatureTransport, profile: Profile) -> Result<()> {
    debug!(%profile, "switching active profile");
    session::scoped(transport, |s| {
        s.write(ReportSize::Short, address::ACTIVE_PROFILE, &[profile.index()])
    })
}
