use super::checksum::CHECKSUM_SIZE;

/// The commands this peer speaks.
///
/// `Version`, `VerAck` and `Addr` arrive from the wire and have handlers;
/// `GetAddr` and `GetBlocks` are request commands this node only sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Version,
    VerAck,
    Addr,
    GetAddr,
    GetBlocks,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Version => "version",
            Command::VerAck => "verack",
            Command::Addr => "addr",
            Command::GetAddr => "getaddr",
            Command::GetBlocks => "getblocks",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "version" => Self::Version,
            "verack" => Self::VerAck,
            "addr" => Self::Addr,
            "getaddr" => Self::GetAddr,
            "getblocks" => Self::GetBlocks,
            _ => return None,
        })
    }

    /// Whether an incoming frame for this command has a registered handler.
    pub fn has_handler(self) -> bool {
        matches!(self, Command::Version | Command::VerAck | Command::Addr)
    }

    /// Byte count of the integrity checksum framed ahead of this command's
    /// payload. `version` and `verack` are exempt from checksum framing.
    pub fn checksum_size(self) -> usize {
        match self {
            Command::Version | Command::VerAck => 0,
            _ => CHECKSUM_SIZE,
        }
    }
}
