/// Represents the network a connection belongs to.
///
/// The magic value is the first field of every frame header and doubles as
/// a stream-alignment marker: a header carrying any other value means the
/// peer speaks a different network (or the stream is garbage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Mainnet
    /// Default Port 8333
    MainNet,

    /// Testnet
    /// Default Port 18333
    TestNet,

    /// Regtest
    /// Default Port 18444
    RegTest,
}

impl Network {
    /// The magic value as serialized little-endian in the frame header.
    pub fn magic(self) -> u32 {
        match self {
            Network::MainNet => 0xd9b4_bef9,
            Network::TestNet => 0x0709_110b,
            Network::RegTest => 0xdab5_bffa,
        }
    }

    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            0xd9b4_bef9 => Some(Network::MainNet),
            0x0709_110b => Some(Network::TestNet),
            0xdab5_bffa => Some(Network::RegTest),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, TestResult};
    use quickcheck_macros::quickcheck;

    impl Arbitrary for Network {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            match u8::arbitrary(g) % 3 {
                0 => Self::MainNet,
                1 => Self::TestNet,
                2 => Self::RegTest,
                _ => unreachable!(),
            }
        }
    }

    #[quickcheck]
    fn test_magic_round_trip(network: Network) -> TestResult {
        TestResult::from_bool(Network::from_magic(network.magic()) == Some(network))
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(Network::from_magic(0xd9b4bef9), Some(Network::MainNet));
        assert_eq!(Network::from_magic(0x0709110b), Some(Network::TestNet));
        assert_eq!(Network::from_magic(0xdab5bffa), Some(Network::RegTest));
        assert_eq!(Network::from_magic(0xdeadbeef), None);
    }
}
