use std::fmt;

/// The IPv4-multicast OUI: frames whose destination starts with these
/// three bytes carry an IPv4 multicast group address in the low 23 bits.
const MULTICAST_OUI: [u8; 3] = [0x01, 0x00, 0x5e];

const BROADCAST: Mac = Mac([0xff; 6]);

/// A 6-byte Ethernet hardware address.
///
/// Ordered byte-wise unsigned, so `Mac`s can be used as `BTreeMap` keys
/// or sorted for stable REPL output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mac([u8; 6]);

impl Mac {
    pub const BROADCAST: Mac = BROADCAST;

    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != 6 {
            return None;
        }
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; 6]
    }

    pub fn is_multicast(&self) -> bool {
        self.0[0..3] == MULTICAST_OUI
    }
}

impl fmt::Display for Mac {
    /// Canonical text form: `hhhh.hhhh.hhhh`, lowercase hex, two bytes
    /// per group.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mac({self})")
    }
}
