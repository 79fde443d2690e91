//! Server error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid socket address: {0}")]
    InvalidAddress(String),

    #[error("OSC encode error: {0}")]
    Encode(String),

    #[error("core error: {0}")]
    Core(#[from] alsa_osc_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
