//! Latitude/longitude primitives used by the OpenCage provider.
//!
//! OpenCage speaks `lat, lng` order everywhere except the `bounds` request
//! parameter, which is `min lng, min lat, max lng, max lat`. The conversions
//! to and from [`Point`](../struct.Point.html) follow the crate-wide
//! `[Longitude, Latitude]` (`x, y`) convention.
use crate::Point;
use crate::{Deserialize, Serialize};

/// A point in WGS 84 decimal degrees
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Out-of-range point used on the wire to mean "no coordinate"
    pub const INVALID: LatLng = LatLng {
        lat: -91.0,
        lng: -181.0,
    };

    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// `true` iff latitude is within [-90, 90] and longitude within [-180, 180], inclusive
    ///
    /// ```
    /// use ocgeo::coords::LatLng;
    ///
    /// assert!(LatLng::new(90.0, -180.0).is_valid());
    /// assert!(!LatLng::INVALID.is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Formats the point as `lat,lng` with 8 fractional digits
impl From<LatLng> for String {
    fn from(p: LatLng) -> String {
        format!("{:.8},{:.8}", p.lat, p.lng)
    }
}

impl From<LatLng> for Point<f64> {
    fn from(p: LatLng) -> Point<f64> {
        Point::new(p.lng, p.lat)
    }
}

impl From<Point<f64>> for LatLng {
    fn from(p: Point<f64>) -> LatLng {
        LatLng::new(p.y(), p.x())
    }
}

/// A bounding box given by its north-east and south-west corners
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

impl LatLngBounds {
    pub fn new(northeast: LatLng, southwest: LatLng) -> Self {
        LatLngBounds {
            northeast,
            southwest,
        }
    }

    /// Both corners must be valid points
    pub fn is_valid(&self) -> bool {
        self.northeast.is_valid() && self.southwest.is_valid()
    }
}

/// Convert bounds into the `bounds` request parameter
///
/// The order is south-west lng, south-west lat, north-east lng, north-east lat.
impl From<LatLngBounds> for String {
    fn from(b: LatLngBounds) -> String {
        format!(
            "{:.8},{:.8},{:.8},{:.8}",
            b.southwest.lng, b.southwest.lat, b.northeast.lng, b.northeast.lat
        )
    }
}

/// An absent bounding box is never valid
pub fn is_valid_bounds(bounds: Option<&LatLngBounds>) -> bool {
    bounds.map_or(false, LatLngBounds::is_valid)
}

/// A coordinate expressed in degrees, minutes and seconds
///
/// The sign lives on `degrees`. Because `degrees` cannot hold a negative zero,
/// `negative` records the direction separately and is what
/// [`to_decimal`](#method.to_decimal) honours.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DegreeCoords {
    pub degrees: i32,
    pub minutes: i32,
    pub seconds: f64,
    pub negative: bool,
}

impl DegreeCoords {
    /// Build from components; the direction is taken from the sign of `degrees`
    pub fn new(degrees: i32, minutes: i32, seconds: f64) -> Self {
        DegreeCoords {
            degrees,
            minutes,
            seconds,
            negative: degrees < 0,
        }
    }

    /// Split a decimal coordinate into degrees, minutes and seconds
    ///
    /// ```
    /// use ocgeo::coords::DegreeCoords;
    ///
    /// let dms = DegreeCoords::from_decimal(-10.1245839);
    /// assert_eq!((dms.degrees, dms.minutes), (-10, 7));
    /// assert!((dms.seconds - 28.5).abs() < 0.01);
    /// ```
    pub fn from_decimal(decimal: f64) -> Self {
        let abs = decimal.abs();
        let degrees = abs.floor();
        let minutes = ((abs - degrees) * 60.0).floor();
        let seconds = 3600.0 * (abs - degrees) - 60.0 * minutes;
        let negative = decimal < 0.0;
        DegreeCoords {
            degrees: if negative {
                -(degrees as i32)
            } else {
                degrees as i32
            },
            minutes: minutes as i32,
            seconds,
            negative,
        }
    }

    pub fn to_decimal(&self) -> f64 {
        let sign = if self.negative { -1.0 } else { 1.0 };
        sign * (f64::from(self.degrees.abs())
            + f64::from(self.minutes) / 60.0
            + self.seconds / 3600.0)
    }
}
