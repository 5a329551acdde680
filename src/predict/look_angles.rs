use crate::predict::GroundStation;

/// Observer-relative direction and distance to the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Degrees above the local horizontal plane, in [-90, 90].
    pub elevation_deg: f64,
    /// Degrees clockwise from local north, in [0, 360).
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Look angles from `station` to an object at `position_teme` (km, inertial
/// frame), given the sidereal rotation angle in radians at the same instant.
pub fn look_angles(
    position_teme: [f64; 3],
    station: &GroundStation,
    sidereal_rad: f64,
) -> LookAngles {
    let sat_ecef = teme_to_ecef_position(position_teme, sidereal_rad);
    let sta_ecef = station.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());

    // atan2 of a zero vector is 0, which keeps the pole and range ~ 0 cases finite
    let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
    let elevation_deg = if range_km > 0.0 {
        (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        0.0
    };

    LookAngles {
        elevation_deg,
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        azimuth_deg: if azimuth_deg >= 360.0 { 0.0 } else { azimuth_deg },
        range_km,
    }
}

/// Rotate an inertial position about the polar axis into the Earth-fixed frame.
pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::ground_station::EARTH_EQUATORIAL_RADIUS_KM;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn equator() -> GroundStation {
        GroundStation::default()
    }

    #[test]
    fn object_directly_overhead_is_at_zenith() {
        let position = [EARTH_EQUATORIAL_RADIUS_KM + 500.0, 0.0, 0.0];
        let angles = look_angles(position, &equator(), 0.0);
        assert!((angles.elevation_deg - 90.0).abs() < EPS);
        assert!((angles.range_km - 500.0).abs() < EPS);
    }

    #[test]
    fn azimuth_is_clockwise_from_north() {
        let r = EARTH_EQUATORIAL_RADIUS_KM;
        let north = look_angles([r, 0.0, 1000.0], &equator(), 0.0);
        let east = look_angles([r, 1000.0, 0.0], &equator(), 0.0);
        let south = look_angles([r, 0.0, -1000.0], &equator(), 0.0);
        let west = look_angles([r, -1000.0, 0.0], &equator(), 0.0);

        assert!(north.azimuth_deg.abs() < EPS);
        assert!((east.azimuth_deg - 90.0).abs() < EPS);
        assert!((south.azimuth_deg - 180.0).abs() < EPS);
        assert!((west.azimuth_deg - 270.0).abs() < EPS);
        // all four sit on the local horizontal plane
        for angles in [north, east, south, west] {
            assert!(angles.elevation_deg.abs() < EPS);
            assert!((angles.range_km - 1000.0).abs() < EPS);
        }
    }

    #[test]
    fn below_horizon_is_negative() {
        // far side of the Earth
        let angles = look_angles([-EARTH_EQUATORIAL_RADIUS_KM - 500.0, 0.0, 0.0], &equator(), 0.0);
        assert!((angles.elevation_deg + 90.0).abs() < EPS);
    }

    #[test]
    fn sidereal_rotation_moves_object_into_view() {
        // Inertial position on the +Y axis is overhead once the Earth has turned 90 degrees.
        let position = [0.0, EARTH_EQUATORIAL_RADIUS_KM + 400.0, 0.0];
        let unrotated = look_angles(position, &equator(), 0.0);
        let rotated = look_angles(position, &equator(), FRAC_PI_2);
        assert!(unrotated.elevation_deg < 0.0);
        assert!((rotated.elevation_deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn polar_observer_stays_finite() {
        let pole = GroundStation::new(90.0, 0.0, 0.0);
        let overhead = [0.0, 0.0, 7000.0];
        let angles = look_angles(overhead, &pole, 1.234);
        assert!(angles.elevation_deg.is_finite());
        assert!(angles.azimuth_deg.is_finite());
        assert!((angles.elevation_deg - 90.0).abs() < 1e-6);
        assert!((0.0..360.0).contains(&angles.azimuth_deg));
    }

    #[test]
    fn coincident_object_does_not_panic() {
        let station = equator();
        let angles = look_angles(station.position_ecef_km(), &station, 0.0);
        assert_eq!(angles.range_km, 0.0);
        assert_eq!(angles.elevation_deg, 0.0);
        assert!((0.0..360.0).contains(&angles.azimuth_deg));
    }
}
