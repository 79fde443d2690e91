//! Common test helpers for alsa-osc tests
//!
//! - A recording [`Actuator`] that can be told to fail
//! - A static [`Enumerator`] built from fixtures
//! - Condition-based waiting (no hardcoded sleeps)

use alsa_osc_core::{
    Actuator, CardInfo, CardSnapshot, ChannelSelector, ControlDescriptor, ControlTarget,
    Enumerator, Error, Level, Result, Snapshot,
};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Default test timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default condition check interval
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Condition-Based Waiting
// ============================================================================

/// Wait for a condition with timeout - condition-based, not time-based
pub async fn wait_for<F>(check: F, max_wait: Duration) -> bool
where
    F: Fn() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < max_wait {
        if check() {
            return true;
        }
        tokio::time::sleep(DEFAULT_CHECK_INTERVAL).await;
    }
    check()
}

// ============================================================================
// Recording Actuator
// ============================================================================

/// One call observed by [`RecordingActuator`]
#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Volume {
        target: ControlTarget,
        channel: ChannelSelector,
        level: Level,
    },
    Mute {
        target: ControlTarget,
        mute: bool,
    },
    Record {
        target: ControlTarget,
        armed: bool,
    },
}

/// Actuator that records every call instead of touching hardware
#[derive(Debug, Default)]
pub struct RecordingActuator {
    calls: Mutex<Vec<ActuatorCall>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a mixer error
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock() = Some(message.to_string());
    }

    /// Stop failing
    pub fn recover(&self) {
        *self.fail_with.lock() = None;
    }

    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<ActuatorCall> {
        self.calls.lock().last().cloned()
    }

    fn record(&self, call: ActuatorCall) -> Result<()> {
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(Error::Mixer(message));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl Actuator for RecordingActuator {
    fn set_volume(&self, target: &ControlTarget, channel: ChannelSelector, level: Level) -> Result<()> {
        self.record(ActuatorCall::Volume {
            target: target.clone(),
            channel,
            level,
        })
    }

    fn set_mute(&self, target: &ControlTarget, mute: bool) -> Result<()> {
        self.record(ActuatorCall::Mute {
            target: target.clone(),
            mute,
        })
    }

    fn set_record(&self, target: &ControlTarget, armed: bool) -> Result<()> {
        self.record(ActuatorCall::Record {
            target: target.clone(),
            armed,
        })
    }
}

// ============================================================================
// Static Enumerator
// ============================================================================

/// Enumerator serving a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticEnumerator {
    snapshot: Snapshot,
    /// Card indices whose control listing fails
    broken: Vec<u32>,
}

impl StaticEnumerator {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            broken: Vec::new(),
        }
    }

    /// Make listing the controls of `card` fail
    pub fn with_broken_card(mut self, card: u32) -> Self {
        self.broken.push(card);
        self
    }
}

impl Enumerator for StaticEnumerator {
    fn cards(&self) -> Result<Vec<CardInfo>> {
        Ok(self.snapshot.cards.iter().map(|c| c.card.clone()).collect())
    }

    fn controls(&self, card: &CardInfo) -> Result<Vec<ControlDescriptor>> {
        if self.broken.contains(&card.index) {
            return Err(Error::Enumeration(format!("card {} unreadable", card.index)));
        }

        self.snapshot
            .cards
            .iter()
            .find(|c| c.card.index == card.index)
            .map(|c| c.controls.clone())
            .ok_or(Error::CardNotFound(card.index))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// The "PCM" control of a stereo USB codec: mute-capable, no record switch
pub fn usb_codec_pcm() -> ControlDescriptor {
    ControlDescriptor::new(0, "PCM")
        .with_channels(2)
        .with_mute(true)
        .with_record(false)
        .with_range(0.0, 100.0)
        .with_db_range(-60.0, 0.0)
}

/// Card 0, "USB Audio CODEC", with PCM playback and a mono mic capture
pub fn usb_codec_card() -> CardSnapshot {
    let mic = ControlDescriptor::new(0, "Mic")
        .with_channels(1)
        .with_record(true)
        .with_range(0.0, 16.0)
        .with_db_range(0.0, 23.81);

    CardSnapshot::new(
        CardInfo::new(0, "USB Audio CODEC").with_long_name("Burr-Brown from TI USB Audio CODEC"),
        vec![usb_codec_pcm(), mic],
    )
}

/// Card 1, "Loopback", with no mixer controls
pub fn empty_card() -> CardSnapshot {
    CardSnapshot::new(CardInfo::new(1, "Loopback"), Vec::new())
}

/// Both fixture cards
pub fn fixture_snapshot() -> Snapshot {
    Snapshot::new(vec![usb_codec_card(), empty_card()])
}
