use super::{Header, RequestType};
use macros::packet;

/// Checks the network connection and the key. Answered with an ack.
#[packet(size = 24)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PingPacket {
    pub header: Header,

    /// Chosen by the client, usually a sequence number.
    pub id: u16,

    pub reserved: u16,
    pub reserved2: u32,
}

impl PingPacket {
    pub fn new(key: u64, id: u16) -> Self {
        Self {
            header: Header::request(RequestType::Ping, key),
            id,
            reserved: 0,
            reserved2: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{de::from_bytes, packets::seal};

    #[test]
    fn round_trip() {
        let mut ping = PingPacket::new(0x0123_4567_89AB_CDEF, 0x1234);
        let bytes = seal(&mut ping).expect("Failed to seal packet");

        let parsed: PingPacket = from_bytes(&bytes).expect("Failed to parse packet");

        assert_eq!(parsed, ping);
        assert_eq!(parsed.header.kind, RequestType::Ping as u16);
    }
}
