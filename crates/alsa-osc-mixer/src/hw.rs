//! alsa-lib simple mixer backend
//!
//! Cards are opened as `hw:<index>`. The mixer is reopened on every call, so
//! nothing is held between messages and a card that disappears only fails
//! the calls addressed to it.

use ::alsa::card::{Card, Iter as CardIter};
use ::alsa::mixer::{MilliBel, Mixer, Selem, SelemChannelId, SelemId};
use ::alsa::Round;
use alsa_osc_core::{
    Actuator, CardInfo, ChannelSelector, ControlDescriptor, ControlTarget, Enumerator, Level,
};
use tracing::{debug, trace};

use crate::convert::{centibels_to_db, db_to_centibels, percent_to_raw, skip_unreadable, SwitchCaps};
use crate::{MixerError, Result};

/// Enumerator and actuator backed by alsa-lib
#[derive(Debug, Default, Clone, Copy)]
pub struct AlsaMixer;

impl AlsaMixer {
    pub fn new() -> Self {
        Self
    }

    fn open(card: u32) -> Result<Mixer> {
        Mixer::new(&format!("hw:{}", card), false).map_err(|e| {
            debug!("Failed to open mixer hw:{}: {}", card, e);
            MixerError::CardNotFound(card)
        })
    }

    fn list_cards(&self) -> Vec<CardInfo> {
        let cards = CardIter::new().map(|card| {
            let card: Card = card?;
            let name = card.get_name()?;
            let long_name = card.get_longname().unwrap_or_else(|_| name.clone());
            Ok::<_, ::alsa::Error>(
                CardInfo::new(card.get_index() as u32, name).with_long_name(long_name),
            )
        });

        skip_unreadable("sound card", cards)
    }

    fn list_controls(&self, card: &CardInfo) -> Result<Vec<ControlDescriptor>> {
        let mixer = Self::open(card.index)?;
        let mut controls = Vec::new();

        let elems = mixer.iter().filter_map(Selem::new).map(|selem| {
            let name = selem.get_id().get_name()?.to_string();
            Ok::<_, ::alsa::Error>((selem, name))
        });
        let what = format!("card {} control", card.index);

        for (selem, name) in skip_unreadable(&what, elems) {
            let direction = Direction::of(&selem);

            let caps = SwitchCaps {
                common: selem.has_common_switch(),
                playback: selem.has_playback_switch(),
                capture: selem.has_capture_switch(),
            };

            let (min, max) = direction.volume_range(&selem);
            let (db_min, db_max) = direction.db_range(&selem);
            let channels = direction.channels(&selem).len() as u32;

            trace!(
                "card {} '{}': {} channels, caps {:?}, range {}..{}, dB {}..{}",
                card.index,
                name,
                channels,
                caps,
                min,
                max,
                db_min,
                db_max
            );

            controls.push(
                ControlDescriptor::new(card.index, name)
                    .with_channels(channels)
                    .with_mute(caps.can_mute())
                    .with_record(caps.can_record())
                    .with_range(min as f64, max as f64)
                    .with_db_range(db_min, db_max),
            );
        }

        Ok(controls)
    }

    fn apply_volume(&self, target: &ControlTarget, channel: ChannelSelector, level: Level) -> Result<()> {
        let mixer = Self::open(target.card)?;
        let selem = find(&mixer, target)?;
        let direction = Direction::of(&selem);

        if direction == Direction::None {
            return Err(MixerError::Unsupported {
                control: target.control.clone(),
                capability: "volume".to_string(),
            });
        }

        let channels = match channel {
            ChannelSelector::All => direction.channels(&selem),
            ChannelSelector::Channel(n) => vec![direction.channel(&selem, target, n)?],
        };

        match level {
            Level::Percent(percent) => {
                let (min, max) = direction.volume_range(&selem);
                let raw = percent_to_raw(percent, min, max);
                for ch in channels {
                    direction.set_volume(&selem, ch, raw)?;
                }
            }
            Level::Decibel(db) => {
                let value = MilliBel(db_to_centibels(db));
                for ch in channels {
                    direction.set_db(&selem, ch, value)?;
                }
            }
        }

        Ok(())
    }

    fn apply_mute(&self, target: &ControlTarget, mute: bool) -> Result<()> {
        let mixer = Self::open(target.card)?;
        let selem = find(&mixer, target)?;

        if !(selem.has_playback_switch() || selem.has_common_switch()) {
            return Err(MixerError::Unsupported {
                control: target.control.clone(),
                capability: "mute switch".to_string(),
            });
        }

        // The switch is "on" when sound passes
        selem.set_playback_switch_all(if mute { 0 } else { 1 })?;
        Ok(())
    }

    fn apply_record(&self, target: &ControlTarget, armed: bool) -> Result<()> {
        let mixer = Self::open(target.card)?;
        let selem = find(&mixer, target)?;

        if !selem.has_capture_switch() {
            return Err(MixerError::Unsupported {
                control: target.control.clone(),
                capability: "capture switch".to_string(),
            });
        }

        selem.set_capture_switch_all(if armed { 1 } else { 0 })?;
        Ok(())
    }
}

fn find<'a>(mixer: &'a Mixer, target: &ControlTarget) -> Result<Selem<'a>> {
    mixer
        .find_selem(&SelemId::new(&target.control, 0))
        .ok_or_else(|| MixerError::ControlNotFound {
            card: target.card,
            control: target.control.clone(),
        })
}

/// Which half of an element carries its volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Playback,
    Capture,
    None,
}

impl Direction {
    /// Playback volume if the element has one, capture volume otherwise
    fn of(selem: &Selem) -> Self {
        if selem.has_playback_volume() {
            Direction::Playback
        } else if selem.has_capture_volume() {
            Direction::Capture
        } else {
            Direction::None
        }
    }

    fn channels(&self, selem: &Selem) -> Vec<SelemChannelId> {
        SelemChannelId::all()
            .iter()
            .copied()
            .filter(|&ch| match self {
                Direction::Playback | Direction::None => selem.has_playback_channel(ch),
                Direction::Capture => selem.has_capture_channel(ch),
            })
            .collect()
    }

    fn channel(&self, selem: &Selem, target: &ControlTarget, n: u32) -> Result<SelemChannelId> {
        let channels = self.channels(selem);
        channels
            .get(n as usize)
            .copied()
            .ok_or_else(|| MixerError::ChannelOutOfRange {
                control: target.control.clone(),
                channel: n,
                count: channels.len() as u32,
            })
    }

    fn volume_range(&self, selem: &Selem) -> (i64, i64) {
        match self {
            Direction::Playback => selem.get_playback_volume_range(),
            Direction::Capture => selem.get_capture_volume_range(),
            Direction::None => (0, 0),
        }
    }

    fn db_range(&self, selem: &Selem) -> (f64, f64) {
        let (min, max) = match self {
            Direction::Playback => selem.get_playback_db_range(),
            Direction::Capture => selem.get_capture_db_range(),
            Direction::None => return (0.0, 0.0),
        };
        (centibels_to_db(min.0), centibels_to_db(max.0))
    }

    fn set_volume(&self, selem: &Selem, ch: SelemChannelId, raw: i64) -> Result<()> {
        match self {
            Direction::Playback => selem.set_playback_volume(ch, raw)?,
            Direction::Capture => selem.set_capture_volume(ch, raw)?,
            Direction::None => {}
        }
        Ok(())
    }

    fn set_db(&self, selem: &Selem, ch: SelemChannelId, value: MilliBel) -> Result<()> {
        match self {
            Direction::Playback => selem.set_playback_db(ch, value, Round::Floor)?,
            Direction::Capture => selem.set_capture_db(ch, value, Round::Floor)?,
            Direction::None => {}
        }
        Ok(())
    }
}

impl Enumerator for AlsaMixer {
    fn cards(&self) -> alsa_osc_core::Result<Vec<CardInfo>> {
        Ok(self.list_cards())
    }

    fn controls(&self, card: &CardInfo) -> alsa_osc_core::Result<Vec<ControlDescriptor>> {
        self.list_controls(card)
            .map_err(|e| alsa_osc_core::Error::Enumeration(e.to_string()))
    }
}

impl Actuator for AlsaMixer {
    fn set_volume(
        &self,
        target: &ControlTarget,
        channel: ChannelSelector,
        level: Level,
    ) -> alsa_osc_core::Result<()> {
        Ok(self.apply_volume(target, channel, level)?)
    }

    fn set_mute(&self, target: &ControlTarget, mute: bool) -> alsa_osc_core::Result<()> {
        Ok(self.apply_mute(target, mute)?)
    }

    fn set_record(&self, target: &ControlTarget, armed: bool) -> alsa_osc_core::Result<()> {
        Ok(self.apply_record(target, armed)?)
    }
}
