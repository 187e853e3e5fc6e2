use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::net::{IpAddr, Ipv4Addr};

use super::encode::{Decodable, Encodable};
use super::errors::{PeerError, Result};

pub const ADDRESS_SIZE: usize = 26;

/// A peer address record as carried in version and addr payloads.
///
/// The wire form is fixed at 26 bytes: services, ten zero bytes, the
/// IPv4-mapped marker `0xff 0xff`, four address octets, and a big-endian
/// port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddress {
    pub services: u64,
    pub ip: IpAddr,
    pub port: u16,
}

impl PeerAddress {
    pub fn new(services: u64, ip: IpAddr, port: u16) -> Self {
        Self { services, ip, port }
    }

    /// The four address octets in wire form.
    ///
    /// Only IPv4 addresses, or their IPv4-mapped IPv6 form, fit the record.
    fn octets(&self) -> Result<[u8; 4]> {
        match self.ip {
            IpAddr::V4(v4) => Ok(v4.octets()),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => Ok(v4.octets()),
                None => Err(PeerError::MalformedAddress { len: 16 }),
            },
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(ADDRESS_SIZE);

        buffer.write_u64::<LittleEndian>(self.services)?;

        // padding char[10] + IPv4-mapped marker
        buffer.extend([0u8; 10]);
        buffer.extend([0xff, 0xff]);

        buffer.extend(self.octets()?);
        buffer.write_u16::<BigEndian>(self.port)?;

        Ok(buffer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ADDRESS_SIZE {
            return Err(PeerError::MalformedAddress { len: bytes.len() });
        }

        let mut cursor = bytes;
        let services = cursor.read_u64::<LittleEndian>()?;

        // padding and marker carry no information
        cursor = &cursor[12..];

        let ip = IpAddr::V4(Ipv4Addr::new(cursor[0], cursor[1], cursor[2], cursor[3]));
        cursor = &cursor[4..];

        let port = cursor.read_u16::<BigEndian>()?;

        Ok(Self { services, ip, port })
    }
}

impl Encodable for PeerAddress {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        PeerAddress::to_bytes(self)
    }
}

impl Decodable for PeerAddress {
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        PeerAddress::from_bytes(bytes)
    }
}
