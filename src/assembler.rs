use super::command::Command;
use super::errors::{PeerError, Result};
use super::header::{FrameHeader, HEADER_SIZE};

// 32 MB
const MAX_PAYLOAD_SIZE: u32 = 32 * 1024 * 1024;

/// One complete protocol message carved off the stream.
///
/// For checksum-bearing commands `body` holds the 4-byte checksum followed
/// by the payload; for `version` it is the bare payload; for zero-length
/// payloads it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    AwaitingHeader,
    AwaitingBody { command: Command, body_len: usize },
}

/// Carves the continuous inbound byte stream into discrete frames.
///
/// Bytes arrive in arbitrary-sized chunks through [`FrameAssembler::extend`]
/// and accumulate until the terminator for the current state is reached:
/// 20 bytes for a header, then checksum size plus declared payload length
/// for the body. [`FrameAssembler::next_frame`] hands back at most one
/// completed frame per call and resets the body-wait state before
/// returning it, so a frame handler can never be entered re-entrantly.
///
/// A failed parse leaves the stream untrustworthy; every error returned
/// here is fatal for the connection.
pub struct FrameAssembler {
    magic: u32,
    buffer: Vec<u8>,
    state: AssembleState,
}

impl FrameAssembler {
    pub fn new(magic: u32) -> Self {
        Self {
            magic,
            buffer: Vec::new(),
            state: AssembleState::AwaitingHeader,
        }
    }

    /// Appends one chunk of network input. Nothing is parsed ahead of the
    /// current terminator and nothing is dropped.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pulls the next complete frame, or `None` when more bytes are needed.
    ///
    /// Exactly the consumed prefix is removed from the buffer on each
    /// transition; a partial trailing frame stays buffered for later
    /// chunks.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.state {
                AssembleState::AwaitingHeader => {
                    if self.buffer.len() < HEADER_SIZE {
                        return Ok(None);
                    }

                    let header_bytes: Vec<u8> = self.buffer.drain(..HEADER_SIZE).collect();
                    let header = FrameHeader::from_bytes(&header_bytes)?;

                    if header.magic != self.magic {
                        return Err(PeerError::ProtocolMismatch {
                            got: header.magic,
                            expected: self.magic,
                        });
                    }

                    let command = match Command::from_name(header.command()) {
                        Some(command) if command.has_handler() => command,
                        _ => {
                            return Err(PeerError::UnknownCommand {
                                command: header.command().to_string(),
                                payload_len: header.payload_len,
                            })
                        }
                    };

                    if header.payload_len > MAX_PAYLOAD_SIZE {
                        return Err(PeerError::PayloadTooLarge {
                            len: header.payload_len,
                        });
                    }

                    // no checksum is framed for an empty payload
                    if header.payload_len == 0 {
                        return Ok(Some(Frame {
                            command,
                            body: Vec::new(),
                        }));
                    }

                    self.state = AssembleState::AwaitingBody {
                        command,
                        body_len: command.checksum_size() + header.payload_len as usize,
                    };
                }
                AssembleState::AwaitingBody { command, body_len } => {
                    if self.buffer.len() < body_len {
                        return Ok(None);
                    }

                    let body: Vec<u8> = self.buffer.drain(..body_len).collect();
                    self.state = AssembleState::AwaitingHeader;

                    return Ok(Some(Frame { command, body }));
                }
            }
        }
    }
}
