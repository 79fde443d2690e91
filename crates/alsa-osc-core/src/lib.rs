//! alsa-osc Core
//!
//! Core types and the address-to-control router for alsa-osc.
//!
//! This crate provides:
//! - Mixer descriptions ([`CardInfo`], [`ControlDescriptor`], [`Snapshot`])
//! - OSC address construction ([`Root`], [`RouteKind`])
//! - The immutable routing table ([`RouteTable`], [`RouteEntry`])
//! - Strongly-typed message arguments ([`Value`])
//! - Seams to the mixer driver ([`Enumerator`], [`Actuator`])
//!
//! # Example
//!
//! ```
//! use alsa_osc_core::{CardInfo, CardSnapshot, ControlDescriptor, Root, RouteTable, Snapshot};
//!
//! let card = CardInfo::new(0, "USB Audio CODEC");
//! let pcm = ControlDescriptor::new(0, "PCM").with_channels(2).with_mute(true);
//! let snapshot = Snapshot::new(vec![CardSnapshot::new(card, vec![pcm])]);
//!
//! let table = RouteTable::build(&Root::default(), &snapshot);
//! assert_eq!(table.len(), 7);
//! assert!(table.lookup("/alsa/interface/USB Audio CODEC/PCM/dB/CH1").is_some());
//! ```

pub mod address;
pub mod error;
pub mod routes;
pub mod traits;
pub mod types;
pub mod value;

pub use address::{Root, RouteKind};
pub use error::{Error, Result};
pub use routes::{control_route_count, control_routes, Route, RouteEntry, RouteOp, RouteTable};
pub use traits::{discover, Actuator, Enumerator};
pub use types::{
    CardInfo, CardSnapshot, ChannelSelector, ControlDescriptor, ControlTarget, Level, Snapshot,
    Units, ValueRange,
};
pub use value::Value;

/// Default OSC address root
pub const DEFAULT_ROOT: &str = "/alsa/interface";

/// Default UDP port the OSC server listens on
pub const DEFAULT_OSC_PORT: u16 = 8000;

/// Default bind address for the OSC server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
