use std::net::SocketAddr;
use std::sync::Arc;

use super::{
    address::PeerAddress,
    assembler::{Frame, FrameAssembler},
    checksum::{checksum, CHECKSUM_SIZE},
    command::Command,
    config::{ConnectionConfig, Context},
    errors::{PeerError, Result},
    header::FrameHeader,
    payload::{AddrPayload, VersionPayload},
};

/// Lowest remote protocol version that understands `verack`.
const MIN_VERACK_VERSION: i32 = 209;

/// Transport is the outbound half of a peer link.
///
/// The connection owns its transport and drives it synchronously; the
/// event loop implements this for its socket type.
pub trait Transport {
    /// Queues bytes for delivery to the peer.
    fn push(&mut self, bytes: &[u8]) -> Result<()>;

    /// Tears the link down. Called at most once, on close.
    fn close(&mut self);
}

/// Verdict handed back to the caller after feeding the connection.
#[derive(Debug)]
pub enum Control {
    /// Keep the link open and keep feeding input.
    Continue,
    /// The connection closed itself for the carried reason; drop it.
    Close(PeerError),
}

/// Handshake progress of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Socket opened, nothing sent yet.
    Connecting,
    /// Our `version` is out, waiting on the peer's.
    AwaitingVersion,
    /// Peer's `version` accepted, waiting on its `verack`.
    AwaitingVerack,
    /// Handshake complete.
    Ready,
    /// Torn down; no further input is processed.
    Closed,
}

/// What the peer reported about itself in its `version` payload.
///
/// Recorded at most once per connection; a duplicate `version` leaves the
/// first record in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePeerState {
    pub version: i32,
    pub services: u64,
    pub timestamp: i64,
    pub nonce: u64,
    pub last_block: u32,
}

/// Connection drives the protocol handshake with one peer.
///
/// Inbound bytes are fed through [`Connection::receive`] in whatever chunks
/// the socket produces; completed frames are handled strictly in arrival
/// order and replies go out through the owned [`Transport`]. Every fatal
/// condition funnels through one teardown path that closes the transport
/// and pins the state at [`HandshakeState::Closed`].
pub struct Connection<C, T> {
    config: Arc<ConnectionConfig>,
    context: C,
    transport: T,
    assembler: FrameAssembler,
    state: HandshakeState,
    remote: Option<RemotePeerState>,
    peer: SocketAddr,
}

impl<C, T> Connection<C, T>
where
    C: Context,
    T: Transport,
{
    pub fn new(config: Arc<ConnectionConfig>, context: C, transport: T, peer: SocketAddr) -> Self {
        let assembler = FrameAssembler::new(config.network_magic);

        Self {
            config,
            context,
            transport,
            assembler,
            state: HandshakeState::Connecting,
            remote: None,
            peer,
        }
    }

    /// Call once the socket is up: sends our `version` and starts waiting
    /// on the peer's.
    pub fn on_connect(&mut self) -> Result<()> {
        tracing::debug!("connected to node {}", self.peer);

        if let Err(err) = self.push_version() {
            return Err(self.teardown(err));
        }

        self.state = HandshakeState::AwaitingVersion;
        Ok(())
    }

    /// Feeds one chunk of inbound bytes and handles every frame it
    /// completes, in order.
    pub fn receive(&mut self, chunk: &[u8]) -> Control {
        if self.state == HandshakeState::Closed {
            return Control::Close(PeerError::ConnectionClosed);
        }

        tracing::debug!("received packet {}", chunk.len());
        self.assembler.extend(chunk);

        loop {
            let frame = match self.assembler.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return Control::Continue,
                Err(err) => return Control::Close(self.teardown(err)),
            };

            match self.dispatch(&frame) {
                Ok(Control::Continue) => continue,
                Ok(Control::Close(reason)) => return Control::Close(self.teardown(reason)),
                Err(err) => return Control::Close(self.teardown(err)),
            }
        }
    }

    /// Outgoing-only request for block inventory. The payload stays empty;
    /// block locators are outside this crate.
    pub fn push_getblocks(&mut self) -> Result<()> {
        self.push_frame(Command::GetBlocks, &[])
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn remote(&self) -> Option<&RemotePeerState> {
        self.remote.as_ref()
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    fn dispatch(&mut self, frame: &Frame) -> Result<Control> {
        tracing::debug!("received {} paylen {}", frame.command.name(), frame.body.len());

        match frame.command {
            Command::Version => self.handle_version(&frame.body),
            Command::VerAck => self.handle_verack(),
            Command::Addr => self.handle_addr(&frame.body),
            other => Err(PeerError::UnknownCommand {
                command: other.name().to_string(),
                payload_len: frame.body.len() as u32,
            }),
        }
    }

    fn handle_version(&mut self, body: &[u8]) -> Result<Control> {
        // a repeated version must not clobber the first one
        if self.remote.is_some() {
            return Ok(Control::Continue);
        }

        let payload = VersionPayload::from_bytes(body)?;
        tracing::debug!(
            "version {} services {} timestamp {} nonce {} last block {}",
            payload.version,
            payload.services,
            payload.timestamp,
            payload.nonce,
            payload.start_height,
        );

        if payload.nonce == self.config.nonce && payload.nonce > 1 {
            return Ok(Control::Close(PeerError::SelfConnection {
                nonce: payload.nonce,
            }));
        }

        self.remote = Some(RemotePeerState {
            version: payload.version,
            services: payload.services,
            timestamp: payload.timestamp,
            nonce: payload.nonce,
            last_block: payload.start_height,
        });

        // nodes older than 209 never ack; do not wait on them for one
        if payload.version >= MIN_VERACK_VERSION {
            self.push_verack()?;
        }

        self.context.record_time_delta(self.peer, payload.timestamp);

        // a version trailing an early verack must not drop us out of Ready
        if self.state == HandshakeState::AwaitingVersion {
            self.state = HandshakeState::AwaitingVerack;
        }

        Ok(Control::Continue)
    }

    fn handle_verack(&mut self) -> Result<Control> {
        self.push_getaddr()?;
        self.state = HandshakeState::Ready;

        Ok(Control::Continue)
    }

    fn handle_addr(&mut self, body: &[u8]) -> Result<Control> {
        if body.len() < CHECKSUM_SIZE {
            return Err(PeerError::TruncatedInput {
                needed: CHECKSUM_SIZE,
                have: body.len(),
            });
        }

        let (expected, payload_bytes) = body.split_at(CHECKSUM_SIZE);
        if expected != checksum(payload_bytes) {
            return Ok(Control::Close(PeerError::ChecksumMismatch));
        }
        tracing::debug!("checksum matches");

        let payload = AddrPayload::from_bytes(payload_bytes)?;
        tracing::debug!(
            "received {} addresses from {}",
            payload.addresses.len(),
            self.peer
        );

        Ok(Control::Continue)
    }

    fn push_version(&mut self) -> Result<()> {
        let payload = VersionPayload {
            version: self.config.protocol_version,
            services: self.config.services,
            timestamp: self.context.unix_time(),
            remote: PeerAddress::new(self.config.services, self.peer.ip(), self.peer.port()),
            local: PeerAddress::new(
                self.config.services,
                self.config.local_address.ip(),
                self.config.local_address.port(),
            ),
            nonce: self.config.nonce,
            start_height: self.config.start_height,
        };

        self.push_frame(Command::Version, &payload.to_bytes()?)
    }

    fn push_verack(&mut self) -> Result<()> {
        self.push_frame(Command::VerAck, &[])
    }

    fn push_getaddr(&mut self) -> Result<()> {
        self.push_frame(Command::GetAddr, &[])
    }

    fn push_frame(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        let header = FrameHeader::new(self.config.network_magic, command, payload.len() as u32);
        let mut frame = header.to_bytes()?;

        if !payload.is_empty() {
            if command.checksum_size() > 0 {
                frame.extend(checksum(payload));
            }
            frame.extend(payload);
        }

        tracing::debug!("push {} ({} bytes)", command.name(), frame.len());
        self.transport.push(&frame)
    }

    fn teardown(&mut self, reason: PeerError) -> PeerError {
        tracing::error!("closing connection to {}: {}", self.peer, reason);
        self.transport.close();
        self.state = HandshakeState::Closed;

        reason
    }
}
