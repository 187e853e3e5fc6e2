use sha2::{Digest, Sha256};

pub const CHECKSUM_SIZE: usize = 4;

/// Computes the 4-byte integrity digest over `data`: the first four bytes
/// of SHA256(SHA256(data)).
///
/// Appended to outgoing payload-bearing frames and recomputed to validate
/// incoming ones.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let hash = Sha256::digest(Sha256::digest(data));

    let mut buffer = [0u8; CHECKSUM_SIZE];
    buffer.copy_from_slice(&hash[..CHECKSUM_SIZE]);

    buffer
}
