use super::{seal, Header, ResponseType};
use macros::packet;

/// The key was not valid.
///
/// Requests with bad keys are usually dropped silently; this flag exists so
/// a server may answer a ping with a bad key instead.
pub const FLAG_BAD_KEY: u32 = 0x1;

/// Generic acknowledgement sent in response to certain requests.
#[packet(size = 24)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AckPacket {
    pub header: Header,

    /// Copy of the request's id.
    pub id: u16,

    pub reserved: u16,

    pub flags: u32,
}

impl AckPacket {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// Builds a checksummed ack.
///
/// # Panics
///
/// If `key` is zero. Acks are only built for requests that carried a key.
pub fn make_ack(key: u64, id: u16, flags: u32) -> AckPacket {
    assert!(key != 0, "refusing to build an ack for key 0");

    let mut packet = AckPacket {
        header: Header::response(ResponseType::Ack, key),
        id,
        reserved: 0,
        flags,
    };

    // Integer-only structs cannot fail to serialize
    seal(&mut packet).expect("ack packet failed to encode");

    packet
}
