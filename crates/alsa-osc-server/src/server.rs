//! OSC UDP server
//!
//! Every datagram is decoded with `rosc` and its messages (bundles
//! unpacked, in order) are dispatched one after another in a single task on
//! the blocking thread pool, since mixer calls are synchronous. Separate
//! datagrams run independently and are not ordered relative to each other.
//! At most [`MAX_IN_FLIGHT`] datagrams are being applied at once; the
//! receive loop waits for a free slot before reading more.
//!
//! The protocol is one-way: nothing is ever sent back to the peer.

use alsa_osc_core::{Actuator, RouteTable, DEFAULT_BIND_ADDR, DEFAULT_OSC_PORT};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::dispatch::{Dispatcher, ServerStats};
use crate::error::{Result, ServerError};
use crate::osc::{osc_args_to_values, packet_messages};

/// Largest datagram we accept
const MAX_DATAGRAM: usize = 65535;

/// Datagrams being applied to the mixer at the same time
pub const MAX_IN_FLIGHT: usize = 64;

/// OSC server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscServerConfig {
    /// Bind address for the UDP socket (e.g. "0.0.0.0:8000")
    pub bind_addr: String,
}

impl OscServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            bind_addr: format!("{}:{}", host, port),
        }
    }
}

impl Default for OscServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_ADDR, DEFAULT_OSC_PORT)
    }
}

/// UDP listener feeding a [`Dispatcher`]
pub struct OscServer {
    socket: Arc<UdpSocket>,
    dispatcher: Dispatcher,
    in_flight: Arc<Semaphore>,
}

impl OscServer {
    /// Bind the socket. Failing to bind is fatal for the caller.
    pub async fn bind(
        config: &OscServerConfig,
        routes: Arc<RouteTable>,
        actuator: Arc<dyn Actuator>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(&config.bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.bind_addr.clone(),
                source,
            })?;

        Ok(Self {
            socket: Arc::new(socket),
            dispatcher: Dispatcher::new(routes, actuator),
            in_flight: Arc::new(Semaphore::new(MAX_IN_FLIGHT)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn stats(&self) -> ServerStats {
        self.dispatcher.stats()
    }

    /// Serve until a shutdown signal arrives (or its sender is dropped)
    pub async fn serve(&self, shutdown_rx: &mut mpsc::Receiver<()>) -> Result<()> {
        info!(
            "OSC server listening on {} ({} routes)",
            self.local_addr()?,
            self.dispatcher.routes().len()
        );

        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buf) => {
                    match result {
                        Ok((len, peer)) => self.handle_datagram(&buf[..len], peer).await,
                        Err(e) => {
                            error!("OSC recv error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("OSC server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_datagram(&self, data: &[u8], peer: SocketAddr) {
        let counters = self.dispatcher.counters();
        counters.datagrams.fetch_add(1, Ordering::Relaxed);

        let packet = match rosc::decoder::decode_udp(data) {
            Ok((_, packet)) => packet,
            Err(e) => {
                warn!("OSC decode error from {}: {}", peer, e);
                counters.decode_errors.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let messages: Vec<_> = packet_messages(packet)
            .into_iter()
            .map(|msg| {
                debug!("OSC message from {}: {} {:?}", peer, msg.addr, msg.args);
                let args = osc_args_to_values(&msg.args);
                (msg.addr, args)
            })
            .collect();
        if messages.is_empty() {
            return;
        }

        let permit = match Arc::clone(&self.in_flight).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("OSC dispatch slots closed: {}", e);
                return;
            }
        };

        let dispatcher = self.dispatcher.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            for (addr, args) in &messages {
                dispatcher.dispatch(addr, args);
            }
        });
    }
}
