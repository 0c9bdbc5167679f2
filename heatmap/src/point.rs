//! Point records as served by the data endpoint and the heat points built from them.

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::HeatmapError;

/// Intensity given to a point whose record has no usable intensity value.
pub const DEFAULT_INTENSITY: f64 = 0.5;

/// One element of the endpoint response.
///
/// Both a missing and a `null` intensity decode to `None`. Unknown fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Point weight, if the server sent one.
    #[serde(default)]
    pub intensity: Option<f64>,
}

/// Weighted sample consumed by a heat layer.
///
/// Serializes as a `[latitude, longitude, intensity]` triple, which is the input format of heat
/// layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    latitude: f64,
    longitude: f64,
    intensity: f64,
}

impl HeatPoint {
    /// Creates a new heat point.
    pub fn new(latitude: f64, longitude: f64, intensity: f64) -> Self {
        Self {
            latitude,
            longitude,
            intensity,
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.longitude
    }

    /// Weight of the point.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Returns the `[latitude, longitude, intensity]` triple.
    pub fn to_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.intensity]
    }
}

impl From<PointRecord> for HeatPoint {
    fn from(record: PointRecord) -> Self {
        Self::new(
            record.latitude,
            record.longitude,
            truthy(record.intensity).unwrap_or(DEFAULT_INTENSITY),
        )
    }
}

impl Serialize for HeatPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        for value in self.to_triple() {
            tuple.serialize_element(&value)?;
        }
        tuple.end()
    }
}

// Zero (of either sign) and NaN count as missing, same as an absent value.
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Converts endpoint records into heat points, keeping their number and order.
pub fn to_heat_points(records: impl IntoIterator<Item = PointRecord>) -> Vec<HeatPoint> {
    records.into_iter().map(HeatPoint::from).collect()
}

/// Decodes an endpoint response body.
pub fn decode_records(body: &[u8]) -> Result<Vec<PointRecord>, HeatmapError> {
    Ok(serde_json::from_slice(body)?)
}
