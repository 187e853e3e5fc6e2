use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Write;

use super::command::Command;
use super::encode::{Decodable, Encodable};
use super::errors::{PeerError, Result};

const MAGIC_SIZE: usize = 4;
const COMMAND_NAME_SIZE: usize = 12;
const PAYLOAD_LEN_SIZE: usize = 4;
pub const HEADER_SIZE: usize = MAGIC_SIZE + COMMAND_NAME_SIZE + PAYLOAD_LEN_SIZE;

const HEADER_MAGIC_RANGE: std::ops::Range<usize> = 0..4;
const HEADER_COMMAND_NAME_RANGE: std::ops::Range<usize> = 4..16;
const HEADER_PAYLOAD_LEN_RANGE: std::ops::Range<usize> = 16..20;

/// The fixed 20-byte frame header.
///
/// Layout, integers little-endian:
///
/// ```text
/// magic u32 | command char[12], NUL-padded | payload_len u32
/// ```
///
/// The checksum of payload-bearing frames is not part of the header; it is
/// framed between header and payload for the commands that carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u32,
    command: String,
    pub payload_len: u32,
}

impl FrameHeader {
    pub fn new(magic: u32, command: Command, payload_len: u32) -> Self {
        Self {
            magic,
            command: command.name().to_string(),
            payload_len,
        }
    }

    /// The command name with trailing NUL padding stripped.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(HEADER_SIZE);

        // magic uint32
        buffer.write_u32::<LittleEndian>(self.magic)?;

        // command name char[12], built from `Command` or a decoded header,
        // so never longer than the field
        let command_bytes = self.command.as_bytes();
        buffer.write_all(command_bytes)?;
        (0..COMMAND_NAME_SIZE - command_bytes.len()).try_for_each(|_| buffer.write_u8(0x0))?;

        // payload length uint32
        buffer.write_u32::<LittleEndian>(self.payload_len)?;

        Ok(buffer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(PeerError::TruncatedInput {
                needed: HEADER_SIZE,
                have: bytes.len(),
            });
        }

        let magic = (&bytes[HEADER_MAGIC_RANGE]).read_u32::<LittleEndian>()?;

        let raw_command = &bytes[HEADER_COMMAND_NAME_RANGE];
        let end = raw_command.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        // command names are ASCII on the wire; a non-ASCII byte ends the
        // name so the decoded string stays within the 12-byte field
        let name = &raw_command[..end];
        let ascii = name.iter().take_while(|b| b.is_ascii()).count();
        let command = String::from_utf8_lossy(&name[..ascii]).into_owned();

        let payload_len = (&bytes[HEADER_PAYLOAD_LEN_RANGE]).read_u32::<LittleEndian>()?;

        Ok(Self {
            magic,
            command,
            payload_len,
        })
    }
}

impl Encodable for FrameHeader {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        FrameHeader::to_bytes(self)
    }
}

impl Decodable for FrameHeader {
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        FrameHeader::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_round_trip() {
        let header = FrameHeader::new(0xd9b4bef9, Command::Version, 100);
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.magic, 0xd9b4bef9);
        assert_eq!(decoded.command(), "version");
        assert_eq!(decoded.payload_len, 100);
    }

    #[test]
    fn test_wire_layout() {
        let header = FrameHeader::new(0xd9b4bef9, Command::Addr, 0x0102);
        let bytes = header.to_bytes().unwrap();

        assert_eq!(&bytes[..4], &[0xf9, 0xbe, 0xb4, 0xd9]);
        assert_eq!(&bytes[4..8], b"addr");
        assert_eq!(&bytes[8..16], &[0u8; 8]);
        assert_eq!(&bytes[16..], &[0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_short_command_round_trips_without_padding() {
        let bytes = FrameHeader::new(0, Command::VerAck, 0).to_bytes().unwrap();
        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.command(), "verack");
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            FrameHeader::from_bytes(&[0u8; 19]),
            Err(PeerError::TruncatedInput {
                needed: HEADER_SIZE,
                have: 19
            })
        ));
    }

    #[test]
    fn test_unrecognized_command_preserved() {
        let mut bytes = FrameHeader::new(7, Command::Version, 3).to_bytes().unwrap();
        bytes[4..16].copy_from_slice(b"wtfmessage\0\0");

        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.command(), "wtfmessage");
        assert_eq!(decoded.payload_len, 3);
    }

    #[test]
    fn test_command_name_ends_at_first_non_ascii_byte() {
        let mut bytes = FrameHeader::new(7, Command::Version, 3).to_bytes().unwrap();
        bytes[4..16].copy_from_slice(b"addr\xff\xff\0\0\0\0\0\0");

        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.command(), "addr");
        assert_eq!(decoded.payload_len, 3);
    }

    #[test]
    fn test_all_binary_command_reencodes() {
        let mut bytes = FrameHeader::new(7, Command::Version, 3).to_bytes().unwrap();
        bytes[4..16].copy_from_slice(&[0xff; 12]);

        let decoded = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.command(), "");

        let encoded = decoded.to_bytes().unwrap();
        assert_eq!(encoded.len(), HEADER_SIZE);
        assert_eq!(&encoded[4..16], &[0u8; 12]);
    }

    #[quickcheck]
    fn test_round_trip_any(magic: u32, command: Command, payload_len: u32) -> TestResult {
        let header = FrameHeader::new(magic, command, payload_len);
        let decoded = FrameHeader::from_bytes(&header.to_bytes().unwrap()).unwrap();

        TestResult::from_bool(
            decoded.magic == magic
                && decoded.command() == command.name()
                && decoded.payload_len == payload_len,
        )
    }
}
