//! alsa-osc Mixer Backends
//!
//! Implementations of the [`Enumerator`](alsa_osc_core::Enumerator) and
//! [`Actuator`](alsa_osc_core::Actuator) seams:
//! - [`AlsaMixer`] talks to alsa-lib simple mixer elements (feature `alsa`)
//! - [`DryRunActuator`] only logs what it would have done

pub mod convert;
pub mod dry_run;
pub mod error;

#[cfg(feature = "alsa")]
pub mod hw;

pub use dry_run::DryRunActuator;
pub use error::{MixerError, Result};

#[cfg(feature = "alsa")]
pub use hw::AlsaMixer;
