//! Bitcoin p2p peer connection handling
//!
//! This crate provides the wire framing, binary codecs and handshake state
//! machine for the old-style Bitcoin peer protocol: `version`/`verack`
//! negotiation followed by a `getaddr` for the peer's address book.

mod address;
mod assembler;
mod checksum;
mod command;
mod config;
mod connection;
mod encode;
mod errors;
mod header;
mod network;
mod payload;
pub mod varint;

pub use address::{PeerAddress, ADDRESS_SIZE};
pub use assembler::{Frame, FrameAssembler};
pub use checksum::{checksum, CHECKSUM_SIZE};
pub use command::Command;
pub use config::{ConnectionConfig, Context};
pub use connection::{Connection, Control, HandshakeState, RemotePeerState, Transport};
pub use encode::{decode, encode, Decodable, Encodable};
pub use errors::{PeerError, Result};
pub use header::{FrameHeader, HEADER_SIZE};
pub use network::Network;
pub use payload::{AddrPayload, VersionPayload, VERSION_PAYLOAD_SIZE};
