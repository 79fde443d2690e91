//! Unit conversions between OSC-level values and ALSA driver units

use std::fmt;
use tracing::warn;

/// Map a 0-100 percentage onto a raw volume range, rounding to nearest
pub fn percent_to_raw(percent: u8, min: i64, max: i64) -> i64 {
    let percent = percent.min(100) as f64;
    let span = (max - min) as f64;
    min + (span * percent / 100.0).round() as i64
}

/// ALSA reports dB values in hundredths of a dB
pub fn centibels_to_db(value: i64) -> f64 {
    value as f64 / 100.0
}

pub fn db_to_centibels(db: f64) -> i64 {
    (db * 100.0).round() as i64
}

/// Keep the entries of an enumeration that could be read. One broken card or
/// element is logged and skipped; the rest are still served.
pub fn skip_unreadable<T, E, I>(what: &str, entries: I) -> Vec<T>
where
    E: fmt::Display,
    I: IntoIterator<Item = Result<T, E>>,
{
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping unreadable {}: {}", what, e);
                None
            }
        })
        .collect()
}

/// Switch capabilities of a simple mixer element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchCaps {
    /// One switch shared by playback and capture
    pub common: bool,
    pub playback: bool,
    pub capture: bool,
}

impl SwitchCaps {
    /// A common switch or a playback switch acts as mute
    pub fn can_mute(&self) -> bool {
        self.common || self.playback
    }

    /// Only a dedicated capture switch is a record-arm toggle
    pub fn can_record(&self) -> bool {
        !self.common && self.capture
    }
}
