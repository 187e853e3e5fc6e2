use std::net::SocketAddr;

/// Node identity shared by every connection of one node.
///
/// Built once at startup and handed to each [`crate::Connection`] behind an
/// `Arc`; nothing here changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Network magic every frame must carry, see [`crate::Network`].
    pub network_magic: u32,
    /// Protocol version advertised in our `version` payload.
    pub protocol_version: i32,
    /// Service bits advertised for ourselves and echoed for the peer.
    pub services: u64,
    /// Random per-node nonce used to detect connections to ourselves.
    pub nonce: u64,
    /// Address we advertise as our own in the `version` payload.
    pub local_address: SocketAddr,
    /// Height of the best block we claim to know.
    pub start_height: u32,
}

/// Node-level facilities a connection consults while handling frames.
pub trait Context {
    /// Current unix timestamp in seconds.
    fn unix_time(&self) -> i64;

    /// Reports the timestamp a peer sent in its `version` payload, so the
    /// node can track clock skew against its own time.
    fn record_time_delta(&mut self, peer: SocketAddr, remote_timestamp: i64);
}
