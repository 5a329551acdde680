use chrono::{Duration, TimeZone, Utc};
use pass_o_mat::predict::sampler::sample_at;
use pass_o_mat::predict::{
    find_passes, GroundStation, OrbitalElements, PassFinder, PredictError, Sgp4Propagator,
    TimeWindow,
};

const ISS_1: &str = "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
const ISS_2: &str = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";

fn iss() -> OrbitalElements {
    OrbitalElements::new(Some("ISS (ZARYA)".into()), ISS_1, ISS_2)
}

fn paris() -> GroundStation {
    GroundStation::new(48.8566, 2.3522, 0.035)
}

fn three_days() -> TimeWindow {
    let start = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
    TimeWindow::from_days(start, 3.0, Duration::seconds(20)).unwrap()
}

#[test]
fn iss_passes_over_paris() {
    let report = find_passes(&iss(), &paris(), &three_days(), 10.0).unwrap();

    assert!(report.pass_count > 0, "ISS should pass over Paris within 3 days");
    assert_eq!(report.pass_count, report.passes.len());

    for pass in &report.passes {
        assert!(pass.aos < pass.los);
        assert!(pass.aos <= pass.max_elevation_time && pass.max_elevation_time <= pass.los);
        assert!(pass.max_elevation_deg >= 10.0 && pass.max_elevation_deg <= 90.0);
        assert!((0.0..360.0).contains(&pass.azimuth_at_max_deg));
        assert!((0.0..360.0).contains(&pass.aos_azimuth_deg));
        // low Earth orbit: a pass above 10 deg lasts minutes, not hours
        assert!(pass.duration_seconds > 0.0 && pass.duration_seconds < 15.0 * 60.0);
    }
    for pair in report.passes.windows(2) {
        assert!(pair[0].los < pair[1].aos);
    }
}

#[test]
fn refined_iss_boundaries_are_near_threshold() {
    let propagator = Sgp4Propagator::initialize(&iss()).unwrap();
    let station = paris();
    let report = PassFinder::default()
        .with_min_elevation(10.0)
        .find(&propagator, &station, &three_days())
        .unwrap();

    for pass in report.passes.iter().filter(|p| !p.truncated_start && !p.truncated_end) {
        for instant in [pass.aos, pass.los] {
            let sample = sample_at(&propagator, &station, instant);
            assert!(sample.valid);
            assert!(
                sample.elevation_deg >= 10.0 && sample.elevation_deg < 11.0,
                "elevation {} at {}",
                sample.elevation_deg,
                instant
            );
        }
    }
}

#[test]
fn coarser_step_finds_the_same_boundaries() {
    let fine = find_passes(&iss(), &paris(), &three_days(), 10.0).unwrap();
    let coarse_window =
        TimeWindow::new(three_days().start, three_days().end, Duration::seconds(30)).unwrap();
    let coarse = find_passes(&iss(), &paris(), &coarse_window, 10.0).unwrap();

    // grazing passes may slip between coarse samples; well-risen ones may not
    for pass in fine.passes.iter().filter(|p| p.max_elevation_deg > 15.0) {
        let matched = coarse.passes.iter().any(|c| {
            (c.aos - pass.aos).num_milliseconds().abs() <= 2_000
                && (c.los - pass.los).num_milliseconds().abs() <= 2_000
        });
        assert!(matched, "no coarse match for pass at {}", pass.aos);
    }
}

#[test]
fn malformed_elements_are_rejected_up_front() {
    let garbage = OrbitalElements::new(None, "1 hello", "2 world");
    let err = find_passes(&garbage, &paris(), &three_days(), 10.0).unwrap_err();
    assert!(matches!(err, PredictError::InvalidOrbitalElements(_)));
    assert_eq!(err.code(), "invalid_orbital_elements");
}

#[test]
fn loads_elements_from_multi_object_file() {
    let path = std::env::temp_dir().join(format!("pass-o-mat-{}.tle", std::process::id()));
    std::fs::write(
        &path,
        format!(
            "ISS (ZARYA)\n{}\n{}\nOTHER\n1 99999U\n2 99999\n",
            ISS_1, ISS_2
        ),
    )
    .unwrap();

    let first = OrbitalElements::from_file(&path, None).unwrap();
    assert_eq!(first, iss());
    let by_id = OrbitalElements::from_file(&path, Some(25544)).unwrap();
    assert_eq!(by_id.line2, ISS_2);
    let missing = OrbitalElements::from_file(&path, Some(12345)).unwrap_err();
    assert_eq!(missing.code(), "tle_file");

    std::fs::remove_file(&path).unwrap();
}
