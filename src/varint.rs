use byteorder::{LittleEndian, ReadBytesExt};

use super::errors::{PeerError, Result};

const U16_MARKER: u8 = 0xfd;
const U32_MARKER: u8 = 0xfe;
const U64_MARKER: u8 = 0xff;

/// Encodes `n` in the protocol's compact integer form.
///
/// The encoding is minimal-width: the smallest marker able to represent `n`
/// is always chosen, so values below `0xfd` occupy a single byte.
pub fn encode(n: u64) -> Vec<u8> {
    match n {
        0..=0xfc => vec![n as u8],
        0xfd..=0xffff => {
            let mut out = vec![U16_MARKER];
            out.extend((n as u16).to_le_bytes());
            out
        }
        0x1_0000..=0xffff_ffff => {
            let mut out = vec![U32_MARKER];
            out.extend((n as u32).to_le_bytes());
            out
        }
        _ => {
            let mut out = vec![U64_MARKER];
            out.extend(n.to_le_bytes());
            out
        }
    }
}

/// Decodes a compact integer from the front of `bytes`, returning the value
/// and the unconsumed remainder.
///
/// Non-minimal encodings (a wide marker carrying a small value) are
/// accepted; minimality is an encoding invariant only.
pub fn decode(bytes: &[u8]) -> Result<(u64, &[u8])> {
    let (&marker, rest) = bytes
        .split_first()
        .ok_or(PeerError::TruncatedInput { needed: 1, have: 0 })?;

    let width = match marker {
        U64_MARKER => 8,
        U32_MARKER => 4,
        U16_MARKER => 2,
        value => return Ok((u64::from(value), rest)),
    };

    if rest.len() < width {
        return Err(PeerError::TruncatedInput {
            needed: width,
            have: rest.len(),
        });
    }

    let (mut head, tail) = rest.split_at(width);
    let value = match width {
        2 => u64::from(head.read_u16::<LittleEndian>()?),
        4 => u64::from(head.read_u32::<LittleEndian>()?),
        _ => head.read_u64::<LittleEndian>()?,
    };

    Ok((value, tail))
}
