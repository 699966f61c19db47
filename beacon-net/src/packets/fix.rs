use super::{Header, RequestType};
use crate::{
    geo::{export_geo_point, import_geo_point, Location},
    types::GeoPoint,
};
use macros::packet;

pub const UNKNOWN_DIRECTION: u16 = u16::MAX;
pub const UNKNOWN_SPEED: u16 = u16::MAX;
pub const UNKNOWN_ALTITUDE: i16 = i16::MAX;

/// A GPS fix submitted by a device.
#[packet(size = 32)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixPacket {
    pub header: Header,

    pub location: GeoPoint,

    /// Movement direction in degrees (0..359).
    pub direction: u16,

    /// Speed in m/16s.
    pub speed: u16,

    /// Altitude in m above MSL.
    pub altitude: i16,

    pub reserved: u16,
}

impl FixPacket {
    /// A fix with only a position; everything else is "unknown".
    pub fn new(key: u64, location: Location) -> Self {
        Self {
            header: Header::request(RequestType::Fix, key),
            location: export_geo_point(location),
            direction: UNKNOWN_DIRECTION,
            speed: UNKNOWN_SPEED,
            altitude: UNKNOWN_ALTITUDE,
            reserved: 0,
        }
    }
}

/// A decoded fix with the sentinels resolved.
///
/// Direction, speed and altitude are passed through as received; only their
/// "unknown" values are mapped to `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub location: Option<Location>,
    pub direction: Option<u16>,
    pub speed: Option<u16>,
    pub altitude: Option<i16>,
}

fn known<T: PartialEq>(value: T, unknown: T) -> Option<T> {
    if value == unknown {
        None
    } else {
        Some(value)
    }
}

impl From<&FixPacket> for Fix {
    fn from(packet: &FixPacket) -> Self {
        Self {
            location: import_geo_point(packet.location).valid(),
            direction: known(packet.direction, UNKNOWN_DIRECTION),
            speed: known(packet.speed, UNKNOWN_SPEED),
            altitude: known(packet.altitude, UNKNOWN_ALTITUDE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{de::from_bytes, packets::seal, types::Angle};

    #[test]
    fn new_marks_extras_unknown() {
        let packet = FixPacket::new(1, Location::new(48.0, 11.0));
        let fix = Fix::from(&packet);

        assert_eq!(packet.location.latitude, Angle(48_000_000));
        assert_eq!(packet.location.longitude, Angle(11_000_000));
        assert_eq!(fix.direction, None);
        assert_eq!(fix.speed, None);
        assert_eq!(fix.altitude, None);
    }

    #[test]
    fn extras_pass_through() {
        let mut packet = FixPacket::new(1, Location::invalid());
        packet.direction = 270;
        packet.speed = 400;
        packet.altitude = -12;

        let fix = Fix::from(&packet);

        assert_eq!(fix.location, None);
        assert_eq!(fix.direction, Some(270));
        assert_eq!(fix.speed, Some(400));
        assert_eq!(fix.altitude, Some(-12));
    }

    #[test]
    fn round_trip() {
        let mut packet = FixPacket::new(0xFEED, Location::new(-33.8688, 151.2093));
        let bytes = seal(&mut packet).expect("Failed to seal packet");

        let parsed: FixPacket = from_bytes(&bytes).expect("Failed to parse packet");

        assert_eq!(parsed, packet);
    }

    #[test]
    fn unknown_extras_encoding() {
        let mut packet = FixPacket::new(0xFEED, Location::invalid());
        let bytes = seal(&mut packet).expect("Failed to seal packet");

        assert_eq!(bytes[16..24], [0x7Fu8, 0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0xFF, 0xFF]);
        assert_eq!(bytes[24..32], [0xFFu8, 0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0x00, 0x00]);
    }
}
