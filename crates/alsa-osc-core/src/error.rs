//! Error types for alsa-osc

use thiserror::Error;

/// Result type alias for alsa-osc operations
pub type Result<T> = std::result::Result<T, Error>;

/// alsa-osc error types
#[derive(Error, Debug)]
pub enum Error {
    /// Address root is not a usable OSC path prefix
    #[error("invalid root: {0}")]
    InvalidRoot(String),

    /// Message arguments do not match what the route expects
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Sound card could not be opened or no longer exists
    #[error("card {0} not found")]
    CardNotFound(u32),

    /// Control does not exist on the card
    #[error("control '{control}' not found on card {card}")]
    ControlNotFound { card: u32, control: String },

    /// Channel index beyond what the control exposes
    #[error("channel {channel} out of range for '{control}' ({count} channels)")]
    ChannelOutOfRange {
        control: String,
        channel: u32,
        count: u32,
    },

    /// Control does not support the requested operation
    #[error("'{control}' does not support {operation}")]
    Unsupported { control: String, operation: String },

    /// Device enumeration failed
    #[error("enumeration error: {0}")]
    Enumeration(String),

    /// Mixer driver error
    #[error("mixer error: {0}")]
    Mixer(String),
}
