use thiserror::Error;

pub type Result<T> = std::result::Result<T, PeerError>;

/// PeerError represents a failed or failing peer connection.
///
/// Every variant is fatal for the connection it occurs on: frame boundaries
/// cannot be trusted after a detected inconsistency, so the only safe
/// recovery is a fresh connection.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Network magic mismatch (got {got:#010x}, expected {expected:#010x})")]
    ProtocolMismatch { got: u32, expected: u32 },

    #[error("Unable to handle command {command:?} (paylen={payload_len})")]
    UnknownCommand { command: String, payload_len: u32 },

    #[error("Truncated input (needed {needed} bytes, had {have})")]
    TruncatedInput { needed: usize, have: usize },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Connected to self (nonce {nonce:#x})")]
    SelfConnection { nonce: u64 },

    #[error("Malformed network address ({len} bytes)")]
    MalformedAddress { len: usize },

    #[error("Payload length {len} exceeds limit")]
    PayloadTooLarge { len: u32 },

    #[error("Connection already closed")]
    ConnectionClosed,

    #[error("Failed to read or write buffer")]
    BufferIo(#[from] std::io::Error),
}
