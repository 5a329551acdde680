use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::{PredictError, PropagationUnavailable};
use crate::predict::tle::OrbitalElements;

/// Source of inertial positions for a single orbiting object.
///
/// Implementations must not panic for instants far from the element epoch;
/// they report [`PropagationUnavailable`] instead.
pub trait Propagator {
    /// Position in km in an Earth-centred inertial (TEME) frame.
    fn propagate(&self, time: DateTime<Utc>) -> Result<[f64; 3], PropagationUnavailable>;

    /// Rotation angle in radians between the inertial and Earth-fixed frames.
    fn sidereal_angle(&self, time: DateTime<Utc>) -> f64;
}

/// SGP4/SDP4 propagation of a two-line element set.
pub struct Sgp4Propagator {
    elements: Elements,
    constants: Constants,
}

impl Sgp4Propagator {
    /// Build the propagator state. Malformed element sets are rejected here,
    /// before any sampling happens.
    pub fn initialize(tle: &OrbitalElements) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(
            tle.name.clone(),
            tle.line1.as_bytes(),
            tle.line2.as_bytes(),
        )
        .map_err(|e| PredictError::InvalidOrbitalElements(e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::InvalidOrbitalElements(e.to_string()))?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn object_name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }
}

impl Propagator for Sgp4Propagator {
    fn propagate(&self, time: DateTime<Utc>) -> Result<[f64; 3], PropagationUnavailable> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PropagationUnavailable::new(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationUnavailable::new(e.to_string()))?;

        if prediction.position.iter().all(|c| c.is_finite()) {
            Ok(prediction.position)
        } else {
            Err(PropagationUnavailable::new("non-finite position"))
        }
    }

    fn sidereal_angle(&self, time: DateTime<Utc>) -> f64 {
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
    }
}
