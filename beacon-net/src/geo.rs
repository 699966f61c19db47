//! Conversion between degrees and the micro-degree wire encoding.

use crate::types::{Angle, GeoPoint};

const MICRO: f64 = 1_000_000.0;

/// A position in floating point degrees.
///
/// "No position" is encoded in-band, the same way the wire format does it:
/// [`Location::invalid`] puts a full circle into the latitude, and anything
/// beyond a half circle is treated as invalid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub const fn invalid() -> Self {
        Self::new(360.0, 0.0)
    }

    /// This is not a plausibility check; it only recognises values built by
    /// [`Location::invalid`].
    pub fn is_valid(&self) -> bool {
        self.latitude <= 180.0
    }

    pub fn valid(self) -> Option<Self> {
        if self.is_valid() {
            Some(self)
        } else {
            None
        }
    }
}

impl From<Option<Location>> for Location {
    fn from(location: Option<Location>) -> Self {
        location.unwrap_or_else(Location::invalid)
    }
}

/// Rounds to the nearest micro degree.
///
/// Out of range input saturates one step short of [`Angle::INVALID`], so a
/// real coordinate never encodes as the sentinel.
pub fn export_angle(degrees: f64) -> Angle {
    let micro = (degrees * MICRO)
        .round()
        .max(f64::from(i32::MIN))
        .min(f64::from(Angle::INVALID.0 - 1));

    Angle(micro as i32)
}

pub fn import_angle(angle: Angle) -> f64 {
    f64::from(angle.0) / MICRO
}

/// Locations that are invalid, or have a non-finite axis, become
/// [`GeoPoint::INVALID`].
pub fn export_geo_point(location: Location) -> GeoPoint {
    let finite = location.latitude.is_finite() && location.longitude.is_finite();

    if finite && location.is_valid() {
        GeoPoint {
            latitude: export_angle(location.latitude),
            longitude: export_angle(location.longitude),
        }
    } else {
        GeoPoint::INVALID
    }
}

pub fn import_geo_point(point: GeoPoint) -> Location {
    if point.is_valid() {
        Location::new(import_angle(point.latitude), import_angle(point.longitude))
    } else {
        Location::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn angle_round_trip() {
        for &degrees in &[
            0.0,
            48.0,
            -48.137154,
            11.575382,
            89.999999,
            -90.0,
            179.999999,
            -180.0,
            0.0000004,
        ] {
            let back = import_angle(export_angle(degrees));
            assert!(
                (back - degrees).abs() <= EPSILON,
                "{} came back as {}",
                degrees,
                back
            );
        }
    }

    #[test]
    fn known_encoding() {
        assert_eq!(export_angle(48.0), Angle(48_000_000));
        assert_eq!(export_angle(-11.5), Angle(-11_500_000));
        assert_eq!(import_angle(Angle(1)), 0.000001);
    }

    #[test]
    fn out_of_range_never_encodes_sentinel() {
        assert_eq!(export_angle(5000.0), Angle(i32::MAX - 1));
        assert_eq!(export_angle(f64::INFINITY), Angle(i32::MAX - 1));
        assert_eq!(export_angle(-5000.0), Angle(i32::MIN));
        assert!(export_angle(2147.483647).is_valid());

        let point = export_geo_point(Location::new(10.0, 5000.0));
        assert!(point.is_valid());
        assert!(point.longitude.is_valid());
    }

    #[test]
    fn non_finite_location_exports_sentinel_pair() {
        for &(latitude, longitude) in &[
            (f64::NAN, 11.0),
            (48.0, f64::NAN),
            (48.0, f64::INFINITY),
            (f64::NEG_INFINITY, 11.0),
        ] {
            assert_eq!(
                export_geo_point(Location::new(latitude, longitude)),
                GeoPoint::INVALID
            );
        }
    }

    #[test]
    fn geo_point_round_trip() {
        let location = Location::new(48.137154, 11.575382);
        let back = import_geo_point(export_geo_point(location));

        assert!(back.is_valid());
        assert!((back.latitude - location.latitude).abs() <= EPSILON);
        assert!((back.longitude - location.longitude).abs() <= EPSILON);
    }

    #[test]
    fn invalid_location_exports_sentinel_pair() {
        let point = export_geo_point(Location::invalid());

        assert_eq!(point.latitude, Angle::INVALID);
        assert_eq!(point.longitude, Angle::INVALID);
        assert!(!point.is_valid());
    }

    #[test]
    fn sentinel_pair_imports_invalid() {
        assert!(!import_geo_point(GeoPoint::INVALID).is_valid());
        assert_eq!(import_geo_point(GeoPoint::INVALID).valid(), None);
    }

    #[test]
    fn sentinel_latitude_alone_is_invalid() {
        let point = GeoPoint {
            latitude: Angle::INVALID,
            longitude: Angle(11_000_000),
        };

        assert!(!import_geo_point(point).is_valid());
    }

    #[test]
    fn none_converts_to_invalid() {
        assert!(!Location::from(None).is_valid());
        assert!(Location::from(Some(Location::new(1.0, 2.0))).is_valid());
    }
}
