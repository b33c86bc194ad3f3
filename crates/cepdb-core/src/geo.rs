//! Coordinate type and great-circle distance math.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, as used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Sentinel value meaning "geocoding did not resolve a location".
    ///
    /// `(0, 0)` is open ocean off the West African coast and is never a
    /// real store location in this domain.
    pub const UNRESOLVED: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether this value is the unresolved sentinel.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance between two points in kilometers (haversine).
///
/// Symmetric and deterministic. Performs no range validation — callers
/// must exclude sentinel/unresolved coordinates before calling.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAULISTA: Coordinates = Coordinates {
        latitude: -23.5614,
        longitude: -46.6559,
    };
    const RIO_CENTRO: Coordinates = Coordinates {
        latitude: -22.9068,
        longitude: -43.1729,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(distance_km(PAULISTA, PAULISTA).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(PAULISTA, RIO_CENTRO);
        let ba = distance_km(RIO_CENTRO, PAULISTA);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn sao_paulo_to_rio_is_roughly_360_km() {
        let d = distance_km(PAULISTA, RIO_CENTRO);
        assert!(d > 340.0 && d < 380.0, "got {d} km");
    }

    #[test]
    fn one_degree_of_latitude_is_roughly_111_km() {
        let a = Coordinates::new(-23.0, -46.0);
        let b = Coordinates::new(-24.0, -46.0);
        let d = distance_km(a, b);
        assert!((d - 111.19).abs() < 0.5, "got {d} km");
    }

    #[test]
    fn sentinel_is_unresolved() {
        assert!(Coordinates::UNRESOLVED.is_unresolved());
        assert!(!Coordinates::new(-23.5, -46.6).is_unresolved());
        // A single zero component is not the sentinel.
        assert!(!Coordinates::new(0.0, -46.6).is_unresolved());
    }

    #[test]
    fn finiteness_check() {
        assert!(Coordinates::new(-23.5, -46.6).is_finite());
        assert!(!Coordinates::new(f64::NAN, -46.6).is_finite());
        assert!(!Coordinates::new(-23.5, f64::INFINITY).is_finite());
    }
}
