//! Mixer backend error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MixerError>;

#[derive(Error, Debug)]
pub enum MixerError {
    #[error("card {0} not found")]
    CardNotFound(u32),

    #[error("control '{control}' not found on card {card}")]
    ControlNotFound { card: u32, control: String },

    #[error("channel {channel} out of range for '{control}' ({count} channels)")]
    ChannelOutOfRange {
        control: String,
        channel: u32,
        count: u32,
    },

    #[error("'{control}' has no {capability}")]
    Unsupported { control: String, capability: String },

    #[cfg(feature = "alsa")]
    #[error("alsa error: {0}")]
    Alsa(#[from] ::alsa::Error),

    #[error("mixer error: {0}")]
    Other(String),
}

impl From<MixerError> for alsa_osc_core::Error {
    fn from(e: MixerError) -> Self {
        use alsa_osc_core::Error;

        match e {
            MixerError::CardNotFound(card) => Error::CardNotFound(card),
            MixerError::ControlNotFound { card, control } => Error::ControlNotFound { card, control },
            MixerError::ChannelOutOfRange {
                control,
                channel,
                count,
            } => Error::ChannelOutOfRange {
                control,
                channel,
                count,
            },
            MixerError::Unsupported { control, capability } => Error::Unsupported {
                control,
                operation: capability,
            },
            other => Error::Mixer(other.to_string()),
        }
    }
}
