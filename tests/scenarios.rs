use bls_pulse::data::{SquareWave, generate_square_wave};
use bls_pulse::domain::{BlsParams, Direction, LightCurve, SegmentAnchor, SegmentResultSet};
use bls_pulse::io::export::write_light_curve_csv;
use bls_pulse::io::ingest::{IngestOptions, load_light_curve};
use bls_pulse::io::results::{ResultsFile, read_results_json, write_results_json};
use bls_pulse::search::{run_search, search_arrays};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn params(direction: Direction) -> BlsParams {
    BlsParams {
        nbins: 60,
        segment_size: 2.0,
        min_duration: 0.06,
        max_duration: 0.3,
        direction,
        anchor: SegmentAnchor::Zero,
    }
}

/// Several segments of noisy data with a dip every 150 samples.
fn noisy_curve() -> LightCurve {
    let spec = SquareWave {
        samples: 1500,
        cadence: 0.0204,
        period: 150,
        width: 8,
        phase: 17,
        depth: -3.0,
        baseline: 0.0,
        noise_sigma: 1.0,
        seed: 3,
    };
    generate_square_wave(&spec).unwrap()
}

fn assert_all_or_nothing(set: &SegmentResultSet) {
    let cols = [set.signal_residue(), set.duration(), set.depth(), set.mid_time()];
    for i in 0..set.len() {
        let finite = cols.iter().filter(|c| c[i].is_finite()).count();
        assert!(finite == 0 || finite == 4, "segment {i}: {finite} finite fields");
        assert_eq!(finite == 4, set.segments[i].detection.is_some());
    }
}

#[test]
fn identical_inputs_give_identical_results() {
    init_logging();
    let curve = noisy_curve();
    let a = run_search(&curve, &params(Direction::Either)).unwrap();
    let b = run_search(&curve, &params(Direction::Either)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_segment_is_all_or_nothing() {
    init_logging();
    let curve = noisy_curve();
    for direction in [Direction::Dip, Direction::Either, Direction::Rise] {
        let out = run_search(&curve, &params(direction)).unwrap();
        assert!(out.len() > 1);
        assert_all_or_nothing(&out);
    }
}

#[test]
fn detections_respect_effective_duration_bounds() {
    init_logging();
    let curve = noisy_curve();
    // More bins than a segment holds samples, so every segment is reduced.
    let mut p = params(Direction::Dip);
    p.nbins = 500;
    let out = run_search(&curve, &p).unwrap();

    let mut checked = 0;
    for seg in &out.segments {
        let Some(d) = seg.detection else { continue };
        let bounds = seg.bounds.expect("non-empty segment has bounds");
        assert!(seg.nbins <= seg.n_points);
        let len = d.end_bin - d.start_bin;
        assert!(
            bounds.min_bins <= len && len <= bounds.max_bins,
            "segment {}: len={len} bounds={bounds:?}",
            seg.index
        );
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn gap_in_light_curve_yields_empty_segments() {
    init_logging();
    let mut time: Vec<f64> = (0..100).map(|i| i as f64 * 0.02).collect();
    time.extend((0..100).map(|i| 8.0 + i as f64 * 0.02));
    let flux: Vec<f64> = (0..200).map(|i| if i % 50 < 5 { -4.0 } else { 0.0 }).collect();
    let err = vec![0.1; 200];

    let out = search_arrays(&time, &flux, &err, &params(Direction::Dip)).unwrap();
    // floor(9.98 / 2) + 1
    assert_eq!(out.len(), 5);
    for i in [1, 2, 3] {
        assert_eq!(out.segments[i].n_points, 0);
        assert_eq!(out.segments[i].detection, None);
    }
    assert!(out.segments[0].detection.is_some());
    assert_all_or_nothing(&out);
}

#[test]
fn rise_search_on_negative_flux_finds_nothing() {
    init_logging();
    let time: Vec<f64> = (0..600).map(|i| i as f64 * 0.02).collect();
    let flux: Vec<f64> = (0..600).map(|i| -1.0 - (i % 7) as f64).collect();
    let err = vec![0.1; 600];

    let out = search_arrays(&time, &flux, &err, &params(Direction::Rise)).unwrap();
    assert!(out.len() > 1);
    assert_eq!(out.detection_count(), 0);
    assert!(out.signal_residue().iter().all(|v| v.is_nan()));
    assert!(out.depth().iter().all(|v| v.is_nan()));
}

#[test]
fn csv_round_trip_through_ingest() {
    init_logging();
    let curve = noisy_curve();
    let path = std::env::temp_dir().join(format!("bls_roundtrip_{}.csv", std::process::id()));
    write_light_curve_csv(&path, &curve).unwrap();

    let ingested = load_light_curve(path.to_str().unwrap(), &IngestOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(ingested.curve, curve);
    assert!(ingested.row_errors.is_empty());
    let a = run_search(&curve, &params(Direction::Dip)).unwrap();
    let b = run_search(&ingested.curve, &params(Direction::Dip)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn results_json_round_trip() {
    init_logging();
    let p = params(Direction::Dip);
    let out = run_search(&noisy_curve(), &p).unwrap();
    let file = ResultsFile::new("noisy", &p, &out);

    let path = std::env::temp_dir().join(format!("bls_results_{}.json", std::process::id()));
    write_results_json(&path, &file).unwrap();
    let back = read_results_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(back.params, p);
    assert_eq!(back.results.len(), out.len());
    assert_eq!(back.results.detection_count(), out.detection_count());
}
