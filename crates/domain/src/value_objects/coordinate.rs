//! Geographic coordinate value object
//!
//! Coordinates are kept in the provider's (longitude, latitude) order, which
//! is also the order of the result columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point given by longitude and latitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if longitude is not in [-180, 180]
    /// or latitude is not in [-90, 90], or either is not finite.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Create a coordinate without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The (0, 0) placeholder used for rows that could not be resolved
    #[must_use]
    pub const fn zero() -> Self {
        Self::new_unchecked(0.0, 0.0)
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Whether the longitude or the latitude differs from `other` by more
    /// than `threshold` degrees.
    ///
    /// This is a raw degree comparison, not a geodesic distance. A delta equal
    /// to the threshold does not exceed it.
    #[must_use]
    pub fn delta_exceeds(&self, other: &Self, threshold: f64) -> bool {
        (other.longitude - self.longitude).abs() > threshold
            || (other.latitude - self.latitude).abs() > threshold
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.longitude, self.latitude)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn lng() -> impl Strategy<Value = f64> {
        -180.0f64..=180.0
    }

    fn lat() -> impl Strategy<Value = f64> {
        -90.0f64..=90.0
    }

    proptest! {
        #[test]
        fn in_range_values_are_accepted(x in lng(), y in lat()) {
            prop_assert!(Coordinate::new(x, y).is_ok());
        }

        #[test]
        fn delta_check_is_symmetric(
            x1 in lng(), y1 in lat(), x2 in lng(), y2 in lat(),
            threshold in 0.0f64..1.0
        ) {
            let a = Coordinate::new_unchecked(x1, y1);
            let b = Coordinate::new_unchecked(x2, y2);
            prop_assert_eq!(a.delta_exceeds(&b, threshold), b.delta_exceeds(&a, threshold));
        }

        #[test]
        fn a_point_never_exceeds_itself(x in lng(), y in lat(), threshold in 0.0f64..1.0) {
            let a = Coordinate::new_unchecked(x, y);
            prop_assert!(!a.delta_exceeds(&a, threshold));
        }
    }
}
