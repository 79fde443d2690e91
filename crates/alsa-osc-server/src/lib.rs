//! alsa-osc Server
//!
//! Receives OSC messages over UDP and dispatches them through a
//! [`RouteTable`](alsa_osc_core::RouteTable) to an
//! [`Actuator`](alsa_osc_core::Actuator).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use alsa_osc_core::{Root, RouteTable, Snapshot};
//! use alsa_osc_test_utils::RecordingActuator;
//! use alsa_osc_server::{OscServer, OscServerConfig};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let routes = Arc::new(RouteTable::build(&Root::default(), &Snapshot::default()));
//!     let server = OscServer::bind(&OscServerConfig::default(), routes, Arc::new(RecordingActuator::new())).await?;
//!
//!     let (_shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
//!     server.serve(&mut shutdown_rx).await?;
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod osc;
pub mod sender;
pub mod server;

pub use dispatch::{Dispatch, Dispatcher, ServerStats};
pub use error::{Result, ServerError};
pub use sender::OscSender;
pub use server::{OscServer, OscServerConfig};
