//! Geographic coordinate type and distance functions.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Route costs are summed over
//! thousands of edges and compared for optimality, so single precision is
//! not enough here.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres, used by [`GeoPoint::distance_m`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Construct without validation.  Use [`try_new`](Self::try_new) for
    /// coordinates that come from outside the process.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting non-finite values and out-of-range
    /// latitude (±90°) or longitude (±180°).
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let p = Self { lat, lon };
        if p.is_valid() {
            Ok(p)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Equirectangular projection to planar metres around `ref_lat`.
    ///
    /// Returns `[north_m, east_m]`.  The transform is linear for a fixed
    /// reference latitude, so straight-line distances between projected
    /// points are consistent with axis-aligned bounding boxes (the R-tree
    /// relies on this).
    #[inline]
    pub fn project(self, ref_lat: f64) -> [f64; 2] {
        let k = EARTH_RADIUS_M.to_radians();
        [self.lat * k, self.lon * ref_lat.to_radians().cos() * k]
    }

    /// Shift both axes by `delta_deg` degrees.
    #[inline]
    pub fn offset(self, delta_deg: f64) -> GeoPoint {
        GeoPoint::new(self.lat + delta_deg, self.lon + delta_deg)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("bad latitude {lat:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("bad longitude {lon:?}")))?;
        GeoPoint::try_new(lat, lon)
    }
}

/// Parse a `;`-separated list of `"lat,lon"` pairs.
///
/// Empty items (leading, trailing or doubled separators) are skipped, so
/// `"1,2;3,4;"` yields two points and `""` yields none.
pub fn parse_waypoints(s: &str) -> CoreResult<Vec<GeoPoint>> {
    s.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::parse)
        .collect()
}
