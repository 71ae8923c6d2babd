//! End-to-end classification tests.
//!
//! GeoJSON text -> trails -> candidates -> summary, plus the ordering and
//! tolerance properties consumers rely on.
//!
//! Run with: `cargo test --test t_intersections`
//! Parallel path: `cargo test --test t_intersections --features parallel`

use serde_json::json;
use trail_junctions::{
    classify_pair, find_candidates, lint_trails, summarize, trails_from_geojson_str,
    CandidateRelationship, JunctionKind, ProximityConfig, Trail, TrailIssue, TrailPoint,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(tolerance: f64) -> ProximityConfig {
    ProximityConfig {
        tolerance,
        ..ProximityConfig::default()
    }
}

fn trail(name: &str, coords: &[[f64; 2]]) -> Trail {
    Trail::new(name, coords.iter().map(|&c| TrailPoint::from(c)).collect()).unwrap()
}

/// Deterministic pseudo-random trail network (no rand dependency needed).
fn synthetic_network(count: usize, seed: u64) -> Vec<Trail> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|i| {
            let x0 = -105.30 + next() * 0.02;
            let y0 = 39.97 + next() * 0.02;
            let n = 2 + (next() * 6.0) as usize;
            let mut coords = vec![[x0, y0]];
            for _ in 1..n {
                let [px, py] = coords[coords.len() - 1];
                coords.push([px + (next() - 0.5) * 0.002, py + (next() - 0.5) * 0.002]);
            }
            trail(&format!("Trail {}", i), &coords)
        })
        .collect()
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_t_junction_on_interior_vertex() {
    let trails = vec![
        trail("A", &[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]),
        trail("B", &[[1.0, 0.0], [1.0, 1.0]]),
    ];
    let candidates = find_candidates(&trails, &config(0.01));

    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert!(!c.trail1_start_near_trail2);
    assert!(!c.trail1_end_near_trail2);
    assert!(c.trail2_start_near_trail1);
    assert!(!c.trail2_end_near_trail1);
    assert_eq!(c.kind, JunctionKind::TIntersection);
}

#[test]
fn test_disjoint_trails_produce_nothing() {
    let trails = vec![
        trail("A", &[[0.0, 0.0], [1.0, 0.0]]),
        trail("B", &[[5.0, 5.0], [6.0, 6.0]]),
    ];
    assert!(find_candidates(&trails, &config(0.01)).is_empty());
}

#[test]
fn test_near_miss_endpoints_both_flagged() {
    let trails = vec![
        trail("A", &[[0.0, 0.0], [1.0, 0.0]]),
        trail("B", &[[1.0, 0.00005], [2.0, 0.0]]),
    ];
    let candidates = find_candidates(&trails, &config(0.0001));

    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert!(c.trail1_end_near_trail2);
    assert!(c.trail2_start_near_trail1);
    assert!(!c.trail1_start_near_trail2);
    assert!(!c.trail2_end_near_trail1);
    assert_eq!(c.trail1_end, TrailPoint::new(1.0, 0.0));
    assert_eq!(c.trail2_start, TrailPoint::new(1.0, 0.00005));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_strict_threshold_boundary() {
    let a = trail("A", &[[0.0, 0.0], [0.0, 10.0]]);
    let b = trail("B", &[[0.5, 5.0], [3.0, 5.0]]);

    // B.start is 0.5 from A's segment but 5+ from its vertices; only vertices count
    assert!(classify_pair(&a, &b, &config(0.6)).is_none());

    let c = trail("C", &[[0.5, 10.0], [3.0, 10.0]]);
    assert!(classify_pair(&a, &c, &config(0.5)).is_none());
    assert!(classify_pair(&a, &c, &config(0.5 + 1e-12)).is_some());
}

#[test]
fn test_swap_symmetry_on_network() {
    init_logging();
    let trails = synthetic_network(40, 7);
    let config = config(0.0004);

    for i in 0..trails.len() {
        for j in (i + 1)..trails.len() {
            let forward = classify_pair(&trails[i], &trails[j], &config);
            let backward = classify_pair(&trails[j], &trails[i], &config);
            assert_eq!(forward.map(|c| c.swapped()), backward);
        }
    }
}

#[test]
fn test_no_self_pairs_and_ordering() {
    let trails = synthetic_network(60, 11);
    let candidates = find_candidates(&trails, &config(0.0004));

    let position = |name: &str| trails.iter().position(|t| t.name() == name).unwrap();
    let mut last = None;
    for c in &candidates {
        let (i, j) = (position(&c.trail1), position(&c.trail2));
        assert!(i < j, "{} should precede {}", c.trail1, c.trail2);
        assert!(last < Some((i, j)), "candidates out of enumeration order");
        last = Some((i, j));
        assert!(c.flag_count() >= 1);
    }
}

#[test]
fn test_monotonic_in_tolerance() {
    let trails = synthetic_network(50, 3);
    let pairs = |tolerance: f64| -> Vec<(String, String)> {
        find_candidates(&trails, &config(tolerance))
            .into_iter()
            .map(|c| (c.trail1, c.trail2))
            .collect()
    };

    let mut previous = pairs(0.00005);
    for tolerance in [0.0001, 0.0005, 0.001, 0.005] {
        let current = pairs(tolerance);
        assert!(current.len() >= previous.len());
        for pair in &previous {
            assert!(current.contains(pair), "{:?} lost at {}", pair, tolerance);
        }
        previous = current;
    }
}

#[test]
fn test_flags_monotonic_in_tolerance() {
    let trails = synthetic_network(30, 5);
    let small = find_candidates(&trails, &config(0.0002));
    let large = find_candidates(&trails, &config(0.002));

    for c in &small {
        let wider: &CandidateRelationship = large
            .iter()
            .find(|l| l.trail1 == c.trail1 && l.trail2 == c.trail2)
            .unwrap();
        for (narrow_flag, wide_flag) in c.flags().iter().zip(wider.flags().iter()) {
            assert!(!narrow_flag || *wide_flag);
        }
    }
}

#[test]
fn test_index_does_not_change_results() {
    let trails = synthetic_network(80, 13);
    let linear = find_candidates(
        &trails,
        &ProximityConfig {
            tolerance: 0.0003,
            min_points_for_index: u32::MAX,
            ..ProximityConfig::default()
        },
    );
    let indexed = find_candidates(
        &trails,
        &ProximityConfig {
            tolerance: 0.0003,
            min_points_for_index: 0,
            ..ProximityConfig::default()
        },
    );
    assert_eq!(linear, indexed);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_is_deterministic() {
    use trail_junctions::find_candidates_parallel;

    let trails = synthetic_network(200, 21);
    let config = config(0.0003);
    let sequential = find_candidates(&trails, &config);
    for _ in 0..3 {
        assert_eq!(find_candidates_parallel(&trails, &config), sequential);
    }
}

// ============================================================================
// GeoJSON pipeline
// ============================================================================

#[test]
fn test_geojson_to_summary() {
    init_logging();
    let collection = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Mesa Trail"},
                "geometry": {"type": "LineString", "coordinates": [
                    [-105.2900, 39.9700, 1800.0],
                    [-105.2890, 39.9700, 1805.0],
                    [-105.2880, 39.9700, 1810.0]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Bear Canyon"},
                "geometry": {"type": "LineString", "coordinates": [
                    [-105.2890, 39.97003],
                    [-105.2890, 39.9750]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Unnamed spur"},
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [[-105.2880, 39.9700], [-105.2, 39.9]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Fern Canyon"},
                "geometry": {"type": "LineString", "coordinates": [
                    [-105.2880, 39.97004],
                    [-105.2870, 39.9690]
                ]}
            }
        ]
    });

    let trails = trails_from_geojson_str(&collection.to_string()).unwrap();
    let names: Vec<&str> = trails.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Mesa Trail", "Bear Canyon", "Fern Canyon"]);

    let config = ProximityConfig::default();
    let candidates = find_candidates(&trails, &config);
    assert_eq!(candidates.len(), 2);

    assert_eq!(candidates[0].trail1, "Mesa Trail");
    assert_eq!(candidates[0].trail2, "Bear Canyon");
    assert_eq!(candidates[0].flags(), [false, false, true, false]);
    assert_eq!(candidates[0].kind, JunctionKind::TIntersection);

    assert_eq!(candidates[1].trail1, "Mesa Trail");
    assert_eq!(candidates[1].trail2, "Fern Canyon");
    assert_eq!(candidates[1].flags(), [false, true, true, false]);
    assert_eq!(candidates[1].kind, JunctionKind::Endpoint);

    let summary = summarize(&candidates, 1);
    assert_eq!(summary.t_intersections, 1);
    assert_eq!(summary.endpoint_junctions, 1);
    assert_eq!(summary.truncated, 1);
    let text = summary.to_string();
    assert!(text.contains("Mesa Trail <-> Bear Canyon (T-intersection): Bear Canyon start near Mesa Trail"));
    assert!(text.contains("... and 1 more"));

    assert!(lint_trails(&trails, &config).is_empty());
}

#[test]
fn test_candidate_json_output() {
    let trails = vec![
        trail("A", &[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]),
        trail("B", &[[1.0, 0.0], [1.0, 1.0]]),
    ];
    let candidates = find_candidates(&trails, &config(0.01));
    let value = serde_json::to_value(&candidates).unwrap();

    assert_eq!(
        value,
        json!([{
            "trail1": "A",
            "trail2": "B",
            "trail1StartNearTrail2": false,
            "trail1EndNearTrail2": false,
            "trail2StartNearTrail1": true,
            "trail2EndNearTrail1": false,
            "trail1Start": [0.0, 0.0],
            "trail1End": [2.0, 0.0],
            "trail2Start": [1.0, 0.0],
            "trail2End": [1.0, 1.0],
            "kind": "t_intersection"
        }])
    );
}

#[test]
fn test_lint_reports_without_filtering() {
    let trails = vec![
        trail("Dot", &[[0.0, 0.0]]),
        trail("Line", &[[0.0, 0.0], [1.0, 0.0]]),
    ];
    let issues = lint_trails(&trails, &config(0.01));
    assert_eq!(
        issues,
        vec![TrailIssue::SinglePoint {
            name: "Dot".to_string()
        }]
    );

    // The single-point trail still takes part in classification
    let candidates = find_candidates(&trails, &config(0.01));
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].flags(), [true, true, true, false]);
}
