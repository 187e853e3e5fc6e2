use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Write;

use super::{
    address::{PeerAddress, ADDRESS_SIZE},
    encode::{Decodable, Encodable},
    errors::{PeerError, Result},
    varint,
};

/// Fixed size of the version payload on the wire.
pub const VERSION_PAYLOAD_SIZE: usize = 85;

/// VersionPayload represents the body of a `version` message.
///
/// 85-byte layout: version i32 LE | services u64 LE | timestamp i64 LE |
/// receiver address record | sender address record | nonce u64 LE | one
/// zero pad byte | start_height u32 LE. Bytes past the fixed layout are
/// ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPayload {
    /// The highest protocol version understood by the transmitting node.
    pub version: i32,

    /// The services supported by the transmitting node encoded as a bitfield.
    pub services: u64,

    /// The current unix time according to the transmitting node's clock.
    pub timestamp: i64,

    /// The address of the receiving node as perceived by the transmitter.
    pub remote: PeerAddress,

    /// The address the transmitting node claims as its own.
    pub local: PeerAddress,

    /// A random nonce which can help a node detect a connection to itself.
    pub nonce: u64,

    /// The height of the transmitting node's best block chain.
    pub start_height: u32,
}

impl VersionPayload {
    /// to_bytes converts the payload to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = vec![];
        buffer.write_i32::<LittleEndian>(self.version)?;
        buffer.write_u64::<LittleEndian>(self.services)?;
        buffer.write_i64::<LittleEndian>(self.timestamp)?;
        buffer.write_all(&self.remote.to_bytes()?)?;
        buffer.write_all(&self.local.to_bytes()?)?;
        buffer.write_u64::<LittleEndian>(self.nonce)?;
        buffer.write_u8(0x0)?;
        buffer.write_u32::<LittleEndian>(self.start_height)?;
        Ok(buffer)
    }

    /// from_bytes converts bytes to a payload
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < VERSION_PAYLOAD_SIZE {
            return Err(PeerError::TruncatedInput {
                needed: VERSION_PAYLOAD_SIZE,
                have: bytes.len(),
            });
        }

        let mut cursor = bytes;
        let version = cursor.read_i32::<LittleEndian>()?;
        let services = cursor.read_u64::<LittleEndian>()?;
        let timestamp = cursor.read_i64::<LittleEndian>()?;

        let remote = PeerAddress::from_bytes(&cursor[..ADDRESS_SIZE])?;
        cursor = &cursor[ADDRESS_SIZE..];
        let local = PeerAddress::from_bytes(&cursor[..ADDRESS_SIZE])?;
        cursor = &cursor[ADDRESS_SIZE..];

        let nonce = cursor.read_u64::<LittleEndian>()?;
        cursor.read_u8()?;
        let start_height = cursor.read_u32::<LittleEndian>()?;

        Ok(VersionPayload {
            version,
            services,
            timestamp,
            remote,
            local,
            nonce,
            start_height,
        })
    }
}

impl Encodable for VersionPayload {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        VersionPayload::to_bytes(self)
    }
}

impl Decodable for VersionPayload {
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        VersionPayload::from_bytes(bytes)
    }
}

/// AddrPayload represents the body of an `addr` message
/// https://developer.bitcoin.org/reference/p2p_networking.html#addr
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrPayload {
    pub addresses: Vec<PeerAddress>,
}

impl AddrPayload {
    /// to_bytes converts the payload to bytes: a VarInt count followed by
    /// one 26-byte record per address
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = varint::encode(self.addresses.len() as u64);
        for address in &self.addresses {
            buffer.write_all(&address.to_bytes()?)?;
        }
        Ok(buffer)
    }

    /// from_bytes converts bytes to a payload
    ///
    /// The declared count is checked against the bytes actually present
    /// before anything is allocated, so a hostile count cannot force a
    /// huge reservation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (count, mut rest) = varint::decode(bytes)?;

        let needed = count.saturating_mul(ADDRESS_SIZE as u64);
        if needed > rest.len() as u64 {
            return Err(PeerError::TruncatedInput {
                needed: needed as usize,
                have: rest.len(),
            });
        }

        let mut addresses = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (record, remainder) = rest.split_at(ADDRESS_SIZE);
            addresses.push(PeerAddress::from_bytes(record)?);
            rest = remainder;
        }

        Ok(AddrPayload { addresses })
    }
}

impl Encodable for AddrPayload {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        AddrPayload::to_bytes(self)
    }
}

impl Decodable for AddrPayload {
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        AddrPayload::from_bytes(bytes)
    }
}
