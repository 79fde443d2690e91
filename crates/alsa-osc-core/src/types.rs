//! Mixer description types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sound card as reported by the enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    /// Card index, stable for the process lifetime
    pub index: u32,
    /// Display name used in OSC addresses
    pub name: String,
    /// Long, human-readable name
    pub long_name: String,
}

impl CardInfo {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            index,
            long_name: name.clone(),
            name,
        }
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }
}

/// Closed interval reported by the driver for a control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range. An empty or inverted range (drivers
    /// report `0..0` when they have no dB information) passes the value
    /// through unchanged.
    pub fn clamp(&self, value: f64) -> f64 {
        if self.min < self.max {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// One controllable mixer parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDescriptor {
    /// Index of the owning card
    pub card: u32,
    /// Control name, unique within the card
    pub name: String,
    /// Number of channels (always at least 1)
    pub channels: u32,
    /// Control has a mute switch
    pub can_mute: bool,
    /// Control has a record-arm (capture) switch
    pub can_record: bool,
    /// Raw volume range in driver units
    pub range: ValueRange,
    /// Volume range in dB
    pub db_range: ValueRange,
}

impl ControlDescriptor {
    pub fn new(card: u32, name: impl Into<String>) -> Self {
        Self {
            card,
            name: name.into(),
            channels: 1,
            can_mute: false,
            can_record: false,
            range: ValueRange::default(),
            db_range: ValueRange::new(0.0, 0.0),
        }
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = channels.max(1);
        self
    }

    pub fn with_mute(mut self, can_mute: bool) -> Self {
        self.can_mute = can_mute;
        self
    }

    pub fn with_record(mut self, can_record: bool) -> Self {
        self.can_record = can_record;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = ValueRange::new(min, max);
        self
    }

    pub fn with_db_range(mut self, min: f64, max: f64) -> Self {
        self.db_range = ValueRange::new(min, max);
        self
    }

    /// The (card, control) pair actuator calls are addressed to
    pub fn target(&self) -> ControlTarget {
        ControlTarget {
            card: self.card,
            control: self.name.clone(),
        }
    }
}

/// All controls of one card, in enumeration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub card: CardInfo,
    pub controls: Vec<ControlDescriptor>,
}

impl CardSnapshot {
    pub fn new(card: CardInfo, controls: Vec<ControlDescriptor>) -> Self {
        Self { card, controls }
    }
}

/// Startup view of every card and control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cards: Vec<CardSnapshot>,
}

impl Snapshot {
    pub fn new(cards: Vec<CardSnapshot>) -> Self {
        Self { cards }
    }

    pub fn control_count(&self) -> usize {
        self.cards.iter().map(|c| c.controls.len()).sum()
    }
}

/// Identifies the control an actuator call applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlTarget {
    pub card: u32,
    pub control: String,
}

impl fmt::Display for ControlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card {} '{}'", self.card, self.control)
    }
}

/// Which channels of a control receive a volume change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSelector {
    All,
    Channel(u32),
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSelector::All => write!(f, "all"),
            ChannelSelector::Channel(n) => write!(f, "CH{}", n),
        }
    }
}

/// Scale a volume value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fraction in [0, 1], applied as a 0-100 percentage
    Percent,
    /// Signed decibels
    Decibel,
}

/// A volume request as handed to the actuator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    /// Integer percentage 0-100 of the control's raw range
    Percent(u8),
    /// Absolute level in dB
    Decibel(f64),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Percent(p) => write!(f, "{}%", p),
            Level::Decibel(db) => write!(f, "{} dB", db),
        }
    }
}
