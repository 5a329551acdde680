use serde::{Deserialize, Serialize};

use crate::predict::error::PredictError;

// WGS-84
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
const EARTH_ECCENTRICITY_SQ: f64 = 0.00669437999014;

const MIN_ALTITUDE_KM: f64 = -1.0;
const MAX_ALTITUDE_KM: f64 = 100.0;

/// Observer location on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_km: f64,
}

impl Default for GroundStation {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_km: 0.0,
        }
    }
}

impl GroundStation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        }
    }

    /// Parse `"lat,lon"` in degrees. Altitude defaults to sea level.
    pub fn from_coordinates(coordinates: &str, altitude_km: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat = parts[0].parse().ok()?;
        let lon = parts[1].parse().ok()?;
        Some(Self::new(lat, lon, altitude_km.unwrap_or(0.0)))
    }

    pub fn validate(&self) -> Result<(), PredictError> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(PredictError::InvalidParameters(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(PredictError::InvalidParameters(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            )));
        }
        if !self.altitude_km.is_finite()
            || !(MIN_ALTITUDE_KM..=MAX_ALTITUDE_KM).contains(&self.altitude_km)
        {
            return Err(PredictError::InvalidParameters(format!(
                "altitude {} km outside [{}, {}]",
                self.altitude_km, MIN_ALTITUDE_KM, MAX_ALTITUDE_KM
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n =
            EARTH_EQUATORIAL_RADIUS_KM / (1.0 - EARTH_ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        let x = (n + self.altitude_km) * cos_lat * lon.cos();
        let y = (n + self.altitude_km) * cos_lat * lon.sin();
        let z = (n * (1.0 - EARTH_ECCENTRICITY_SQ) + self.altitude_km) * sin_lat;
        [x, y, z]
    }
}
