//! Actuator that logs instead of touching hardware

use alsa_osc_core::{Actuator, ChannelSelector, ControlTarget, Level, Result};
use tracing::info;

/// Logs every request at `info` and reports success
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunActuator;

impl Actuator for DryRunActuator {
    fn set_volume(&self, target: &ControlTarget, channel: ChannelSelector, level: Level) -> Result<()> {
        info!("[dry-run] {} volume {} -> {}", target, channel, level);
        Ok(())
    }

    fn set_mute(&self, target: &ControlTarget, mute: bool) -> Result<()> {
        info!("[dry-run] {} {}", target, if mute { "mute" } else { "unmute" });
        Ok(())
    }

    fn set_record(&self, target: &ControlTarget, armed: bool) -> Result<()> {
        info!("[dry-run] {} {}", target, if armed { "arm" } else { "disarm" });
        Ok(())
    }
}
