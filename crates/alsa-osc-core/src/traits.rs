//! Mixer driver seams

use tracing::{debug, info, warn};

use crate::types::{CardInfo, CardSnapshot, ChannelSelector, ControlDescriptor, ControlTarget, Level, Snapshot};
use crate::Result;

/// Lists sound cards and their controls
pub trait Enumerator {
    /// All cards, in index order
    fn cards(&self) -> Result<Vec<CardInfo>>;

    /// All controls of one card, in driver order
    fn controls(&self, card: &CardInfo) -> Result<Vec<ControlDescriptor>>;
}

/// Applies control changes to the mixer
///
/// Calls are synchronous and may block on the driver.
pub trait Actuator: Send + Sync {
    /// Set the volume of one or all channels
    fn set_volume(&self, target: &ControlTarget, channel: ChannelSelector, level: Level) -> Result<()>;

    /// Mute (`true`) or unmute (`false`)
    fn set_mute(&self, target: &ControlTarget, mute: bool) -> Result<()>;

    /// Arm (`true`) or disarm (`false`) recording
    fn set_record(&self, target: &ControlTarget, armed: bool) -> Result<()>;
}

impl<A: Actuator + ?Sized> Actuator for std::sync::Arc<A> {
    fn set_volume(&self, target: &ControlTarget, channel: ChannelSelector, level: Level) -> Result<()> {
        (**self).set_volume(target, channel, level)
    }

    fn set_mute(&self, target: &ControlTarget, mute: bool) -> Result<()> {
        (**self).set_mute(target, mute)
    }

    fn set_record(&self, target: &ControlTarget, armed: bool) -> Result<()> {
        (**self).set_record(target, armed)
    }
}

/// Take a snapshot of every card and control.
///
/// A failure listing cards is returned; a failure listing one card's
/// controls is logged and that card contributes no controls.
pub fn discover<E: Enumerator + ?Sized>(enumerator: &E) -> Result<Snapshot> {
    let cards = enumerator.cards()?;
    let mut snapshot = Vec::with_capacity(cards.len());

    for card in cards {
        let controls = match enumerator.controls(&card) {
            Ok(controls) => controls,
            Err(e) => {
                warn!("Failed to list controls of card {} ({}): {}", card.index, card.name, e);
                Vec::new()
            }
        };

        if controls.is_empty() {
            info!("Card {} ({}): no controls found", card.index, card.name);
        } else {
            debug!("Card {} ({}): {} controls", card.index, card.name, controls.len());
        }

        snapshot.push(CardSnapshot::new(card, controls));
    }

    Ok(Snapshot::new(snapshot))
}
