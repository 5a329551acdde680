use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::look_angles::LookAngles;

/// Look angles of the object at one instant of the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    /// False when the propagator had no position for `time`.
    pub valid: bool,
}

impl Sample {
    pub fn from_look_angles(time: DateTime<Utc>, angles: LookAngles) -> Self {
        Self {
            time,
            elevation_deg: angles.elevation_deg,
            azimuth_deg: angles.azimuth_deg,
            range_km: angles.range_km,
            valid: true,
        }
    }

    pub fn unavailable(time: DateTime<Utc>) -> Self {
        Self {
            time,
            elevation_deg: f64::NEG_INFINITY,
            azimuth_deg: 0.0,
            range_km: 0.0,
            valid: false,
        }
    }

    /// Elevation exactly at the threshold counts as visible.
    pub fn is_visible(&self, min_elevation_deg: f64) -> bool {
        self.valid && self.elevation_deg >= min_elevation_deg
    }
}

/// A predicted visibility window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Pass {
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub azimuth_at_max_deg: f64,
    pub aos_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub duration_seconds: f64,
    /// The object was already visible when the search window opened.
    pub truncated_start: bool,
    /// The object was still visible when the search window closed.
    pub truncated_end: bool,
}

/// Result of a pass search.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PassReport {
    pub passes: Vec<Pass>,
    pub pass_count: usize,
    /// More passes were found than the configured cap allowed.
    pub truncated: bool,
}
