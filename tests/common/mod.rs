#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pass_o_mat::predict::{
    GroundStation, PropagationUnavailable, Propagator, EARTH_EQUATORIAL_RADIUS_KM,
};

pub const RANGE_KM: f64 = 1000.0;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap()
}

pub fn equator() -> GroundStation {
    GroundStation::new(0.0, 0.0, 0.0)
}

/// Object whose look angles from (0 N, 0 E, sea level) follow a scripted
/// profile: seconds since `t0` -> (elevation, azimuth) in degrees, or `None`
/// when no position is available.
pub struct Scripted<F> {
    pub t0: DateTime<Utc>,
    pub profile: F,
}

impl<F> Scripted<F>
where
    F: Fn(f64) -> Option<(f64, f64)>,
{
    pub fn new(profile: F) -> Self {
        Self { t0: t0(), profile }
    }
}

impl<F> Propagator for Scripted<F>
where
    F: Fn(f64) -> Option<(f64, f64)>,
{
    fn propagate(&self, time: DateTime<Utc>) -> Result<[f64; 3], PropagationUnavailable> {
        let seconds = (time - self.t0).num_milliseconds() as f64 / 1000.0;
        let (elevation, azimuth) =
            (self.profile)(seconds).ok_or_else(|| PropagationUnavailable::new("scripted gap"))?;
        let (el, az) = (elevation.to_radians(), azimuth.to_radians());
        // at (0, 0) up is +X, east is +Y and north is +Z
        let up = RANGE_KM * el.sin();
        let east = RANGE_KM * el.cos() * az.sin();
        let north = RANGE_KM * el.cos() * az.cos();
        Ok([EARTH_EQUATORIAL_RADIUS_KM + up, east, north])
    }

    fn sidereal_angle(&self, _time: DateTime<Utc>) -> f64 {
        0.0
    }
}

/// Overhead at t0, falling linearly to the horizon at +/-300 s; rises in the
/// west and sets in the east.
pub fn overhead_profile(seconds: f64) -> Option<(f64, f64)> {
    let elevation = (90.0 * (1.0 - seconds.abs() / 300.0)).max(-89.0);
    let azimuth = if seconds < 0.0 { 270.0 } else { 90.0 };
    Some((elevation, azimuth))
}

/// The overhead profile repeated every `period` seconds.
pub fn periodic_profile(period: f64) -> impl Fn(f64) -> Option<(f64, f64)> {
    move |seconds: f64| {
        let phase = seconds.rem_euclid(period) - period / 2.0;
        overhead_profile(phase)
    }
}
