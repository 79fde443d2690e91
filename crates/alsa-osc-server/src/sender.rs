//! Minimal OSC client, for driving a running server from the command line
//! or from tests

use alsa_osc_core::Value;
use rosc::{OscMessage, OscPacket, OscType};
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use crate::error::{Result, ServerError};
use crate::osc::value_to_osc_type;

/// Sends OSC messages to one remote endpoint
pub struct OscSender {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl OscSender {
    /// Resolve `remote` ("host:port") and bind an ephemeral local socket
    pub async fn connect(remote: &str) -> Result<Self> {
        let remote = lookup_host(remote)
            .await
            .map_err(|e| ServerError::InvalidAddress(format!("{}: {}", remote, e)))?
            .next()
            .ok_or_else(|| ServerError::InvalidAddress(remote.to_string()))?;

        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| ServerError::Bind {
                addr: local.to_string(),
                source,
            })?;

        Ok(Self { socket, remote })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// Send raw OSC arguments
    pub async fn send_args(&self, address: &str, args: Vec<OscType>) -> Result<()> {
        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args,
        });
        self.send_packet(&packet).await
    }

    /// Send one value
    pub async fn send(&self, address: &str, value: &Value) -> Result<()> {
        let arg = value_to_osc_type(value).ok_or_else(|| {
            ServerError::Encode(format!("{} cannot be sent as OSC", value.type_name()))
        })?;
        self.send_args(address, vec![arg]).await
    }

    pub async fn send_packet(&self, packet: &OscPacket) -> Result<()> {
        let bytes = rosc::encoder::encode(packet)
            .map_err(|e| ServerError::Encode(format!("{:?}", e)))?;

        self.socket.send_to(&bytes, self.remote).await?;
        debug!("Sent {} bytes to {}", bytes.len(), self.remote);
        Ok(())
    }
}
