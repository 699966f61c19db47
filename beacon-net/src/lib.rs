//! Wire protocol of the Beacon GPS fix receiver.
//!
//! Devices send fixed-size UDP datagrams: a [`packets::Header`] followed by a
//! request specific body, all integers big-endian, protected by a CRC-16.

pub mod crc;
pub mod de;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod packets;
pub mod ser;
pub mod types;

extern crate beacon_net_macros as macros;
