use serde::{Deserialize, Serialize};

/// A latitude or longitude in micro degrees, as carried on the wire.
///
/// `i32::MAX` is reserved to mean "invalid". Check [`Angle::is_valid`]
/// before using the value in any calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Angle(pub i32);

impl Angle {
    pub const INVALID: Angle = Angle(i32::MAX);

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

/// Wire form of a position. Positive means north or east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: Angle,
    pub longitude: Angle,
}

impl GeoPoint {
    pub const INVALID: GeoPoint = GeoPoint {
        latitude: Angle::INVALID,
        longitude: Angle::INVALID,
    };

    /// Only the latitude is consulted; an invalid point always carries the
    /// sentinel in both axes.
    pub const fn is_valid(self) -> bool {
        self.latitude.is_valid()
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::INVALID
    }
}
