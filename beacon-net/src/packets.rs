//! Packet layouts.
//!
//! Every packet is a fixed-size struct whose fields are written in
//! declaration order, big-endian, with no padding. Each struct begins with a
//! [`Header`].

use crate::{crc, error::Result, ser::to_bytes};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

pub mod ack;
pub mod fix;
pub mod ping;

pub use ack::{make_ack, AckPacket, FLAG_BAD_KEY};
pub use fix::{Fix, FixPacket};
pub use ping::PingPacket;

pub const DEFAULT_PORT: u16 = 5598;

pub const MAGIC: u32 = 0xB762_4363;

/// Offset of [`Header::crc`] within every packet.
pub const CRC_OFFSET: usize = 4;

pub const HEADER_SIZE: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum RequestType {
    Nop = 0,
    Ping = 1,
    Fix = 2,
}

impl TryFrom<u16> for RequestType {
    type Error = u16;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(RequestType::Nop),
            1 => Ok(RequestType::Ping),
            2 => Ok(RequestType::Fix),
            other => Err(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ResponseType {
    Nop = 0,
    Ack = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Must be [`MAGIC`].
    pub magic: u32,

    /// CRC of the whole packet, computed while this field is zero.
    pub crc: u16,

    /// A [`RequestType`] or [`ResponseType`] value.
    pub kind: u16,

    /// The authorization key.
    pub key: u64,
}

impl Header {
    pub const fn new(kind: u16, key: u64) -> Self {
        Self {
            magic: MAGIC,
            crc: 0,
            kind,
            key,
        }
    }

    pub const fn request(kind: RequestType, key: u64) -> Self {
        Self::new(kind as u16, key)
    }

    pub const fn response(kind: ResponseType, key: u64) -> Self {
        Self::new(kind as u16, key)
    }
}

pub trait Packet: Serialize {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;
}

/// Computes the CRC of a received packet as if its crc field were zero.
///
/// The whole slice is covered, including any bytes past the end of the
/// declared packet. `None` if `datagram` is shorter than a [`Header`].
pub fn checksum(datagram: &[u8]) -> Option<u16> {
    if datagram.len() < HEADER_SIZE {
        return None;
    }

    let crc = crc::update(0, &datagram[..CRC_OFFSET]);
    let crc = crc::update(crc, &[0, 0]);
    Some(crc::update(crc, &datagram[CRC_OFFSET + 2..]))
}

/// Reads the crc field of a received packet. `None` if `datagram` is
/// shorter than a [`Header`].
pub fn received_crc(datagram: &[u8]) -> Option<u16> {
    if datagram.len() < HEADER_SIZE {
        return None;
    }

    Some(u16::from_be_bytes([
        datagram[CRC_OFFSET],
        datagram[CRC_OFFSET + 1],
    ]))
}

/// Encodes `packet` with a freshly computed CRC.
///
/// The crc field is zeroed, the packet serialized, and the checksum over
/// the full encoding written back both into the bytes and into `packet`.
pub fn seal<P: Packet>(packet: &mut P) -> Result<Vec<u8>> {
    packet.header_mut().crc = 0;

    let mut bytes = to_bytes(packet)?;
    debug_assert_eq!(bytes.len(), P::SIZE);

    let crc = crc::crc16(&bytes);
    packet.header_mut().crc = crc;
    bytes[CRC_OFFSET..CRC_OFFSET + 2].copy_from_slice(&crc.to_be_bytes());

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Angle, GeoPoint};

    fn header() -> Header {
        Header {
            magic: MAGIC,
            crc: 0xA1A2,
            kind: 0xB1B2,
            key: 0xC1C2_C3C4_C5C6_C7C8,
        }
    }

    #[test]
    fn header_layout() {
        let bytes = to_bytes(&header()).expect("Failed to serialize");

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(bytes[0..4], [0xB7u8, 0x62, 0x43, 0x63]);
        assert_eq!(bytes[4..6], [0xA1u8, 0xA2]);
        assert_eq!(bytes[6..8], [0xB1u8, 0xB2]);
        assert_eq!(bytes[8..16], [0xC1u8, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8]);
    }

    #[test]
    fn ping_layout() {
        let bytes = to_bytes(&PingPacket {
            header: header(),
            id: 0x0102,
            reserved: 0x0304,
            reserved2: 0x0506_0708,
        })
        .expect("Failed to serialize");

        assert_eq!(bytes.len(), PingPacket::SIZE);
        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes[16..18], [0x01u8, 0x02]);
        assert_eq!(bytes[18..20], [0x03u8, 0x04]);
        assert_eq!(bytes[20..24], [0x05u8, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn fix_layout() {
        let bytes = to_bytes(&FixPacket {
            header: header(),
            location: GeoPoint {
                latitude: Angle(0x1112_1314),
                longitude: Angle(0x2122_2324),
            },
            direction: 0x3132,
            speed: 0x4142,
            altitude: 0x5152,
            reserved: 0x6162,
        })
        .expect("Failed to serialize");

        assert_eq!(bytes.len(), FixPacket::SIZE);
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[16..20], [0x11u8, 0x12, 0x13, 0x14]);
        assert_eq!(bytes[20..24], [0x21u8, 0x22, 0x23, 0x24]);
        assert_eq!(bytes[24..26], [0x31u8, 0x32]);
        assert_eq!(bytes[26..28], [0x41u8, 0x42]);
        assert_eq!(bytes[28..30], [0x51u8, 0x52]);
        assert_eq!(bytes[30..32], [0x61u8, 0x62]);
    }

    #[test]
    fn ack_layout() {
        let bytes = to_bytes(&AckPacket {
            header: header(),
            id: 0x0102,
            reserved: 0x0304,
            flags: 0x0506_0708,
        })
        .expect("Failed to serialize");

        assert_eq!(bytes.len(), AckPacket::SIZE);
        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes[16..18], [0x01u8, 0x02]);
        assert_eq!(bytes[18..20], [0x03u8, 0x04]);
        assert_eq!(bytes[20..24], [0x05u8, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn sealed_packet_verifies() {
        let mut ping = PingPacket::new(0xDEAD_BEEF, 7);
        let bytes = seal(&mut ping).expect("Failed to seal");

        assert_ne!(ping.header.crc, 0);
        assert_eq!(received_crc(&bytes), Some(ping.header.crc));
        assert_eq!(checksum(&bytes), received_crc(&bytes));
    }

    #[test]
    fn short_input_has_no_checksum() {
        assert_eq!(checksum(&[0u8; 5]), None);
        assert_eq!(received_crc(&[0u8; 5]), None);
        assert_eq!(checksum(&[0u8; HEADER_SIZE - 1]), None);
        assert_eq!(checksum(&[]), None);
        assert!(checksum(&[0u8; HEADER_SIZE]).is_some());
    }

    #[test]
    fn resealing_is_stable() {
        let mut ping = PingPacket::new(0xDEAD_BEEF, 7);
        let first = seal(&mut ping).expect("Failed to seal");
        let second = seal(&mut ping).expect("Failed to seal");

        assert_eq!(first, second);
    }

    #[test]
    fn request_types() {
        assert_eq!(RequestType::try_from(0), Ok(RequestType::Nop));
        assert_eq!(RequestType::try_from(1), Ok(RequestType::Ping));
        assert_eq!(RequestType::try_from(2), Ok(RequestType::Fix));
        assert_eq!(RequestType::try_from(3), Err(3));
    }
}
