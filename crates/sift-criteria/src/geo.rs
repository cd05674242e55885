//! Geo-spatial operand types.

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::value::float_bits;

/// Kilometers per statute mile.
const KILOMETERS_PER_MILE: f64 = 1.609_344;

/// A point in degrees.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeoLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoLocation {
    /// Creates a location from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl PartialEq for GeoLocation {
    fn eq(&self, other: &Self) -> bool {
        float_bits(self.latitude) == float_bits(other.latitude)
            && float_bits(self.longitude) == float_bits(other.longitude)
    }
}

impl Eq for GeoLocation {}

impl Hash for GeoLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        float_bits(self.latitude).hash(state);
        float_bits(self.longitude).hash(state);
    }
}

/// Unit of a [`Distance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers.
    #[default]
    Kilometers,
    /// Statute miles.
    Miles,
}

/// A radius around a location.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Distance {
    /// Magnitude in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: DistanceUnit,
}

impl Distance {
    /// Creates a distance in kilometers.
    pub fn new(value: f64) -> Self {
        Self::with_unit(value, DistanceUnit::Kilometers)
    }

    /// Creates a distance in miles.
    pub fn miles(value: f64) -> Self {
        Self::with_unit(value, DistanceUnit::Miles)
    }

    /// Creates a distance with an explicit unit.
    pub fn with_unit(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// The zero distance.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Returns the distance converted to kilometers.
    pub fn to_kilometers(&self) -> f64 {
        match self.unit {
            DistanceUnit::Kilometers => self.value,
            DistanceUnit::Miles => self.value * KILOMETERS_PER_MILE,
        }
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && float_bits(self.value) == float_bits(other.value)
    }
}

impl Eq for Distance {}

impl Hash for Distance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        float_bits(self.value).hash(state);
        self.unit.hash(state);
    }
}

/// A rectangle given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    /// First corner.
    pub start: GeoLocation,
    /// Opposite corner.
    pub end: GeoLocation,
}

impl BoundingBox {
    /// Creates a box from two opposite corners.
    pub fn new(start: GeoLocation, end: GeoLocation) -> Self {
        Self { start, end }
    }
}
