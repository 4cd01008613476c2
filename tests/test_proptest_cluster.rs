//! Property-based tests for the cluster engine and identifier generator.

use dbscan2d::cluster::{cluster, ClusterablePoint};
use dbscan2d::geometry::Point;
use dbscan2d::id_gen::IdGenerator;
use proptest::prelude::*;

prop_compose! {
    fn arb_point()(x in -20.0..20.0, y in -20.0..20.0) -> (f64, f64) {
        (x, y)
    }
}

fn to_clusterable(coords: &[(f64, f64)]) -> Vec<ClusterablePoint> {
    coords
        .iter()
        .map(|&(x, y)| ClusterablePoint::new(Point::new(x, y)))
        .collect()
}

proptest! {
    #[test]
    fn every_point_ends_with_a_positive_cluster_id(
        coords in prop::collection::vec(arb_point(), 1..50),
        eps in 0.1..5.0,
        min_pts in 1usize..6,
    ) {
        let mut points = to_clusterable(&coords);
        cluster(&mut points, eps, min_pts).unwrap();
        for p in &points {
            prop_assert!(p.cluster_id > 0);
        }
    }

    #[test]
    fn points_with_identical_coordinates_share_a_cluster_id(
        coords in prop::collection::vec(arb_point(), 1..30),
        eps in 0.1..5.0,
        min_pts in 1usize..6,
    ) {
        let mut doubled: Vec<(f64, f64)> = coords.clone();
        doubled.extend(coords.iter().copied());
        let mut points = to_clusterable(&doubled);
        cluster(&mut points, eps, min_pts).unwrap();

        let half = coords.len();
        for i in 0..half {
            prop_assert_eq!(points[i].cluster_id, points[i + half].cluster_id);
        }
    }

    #[test]
    fn doubling_coordinates_and_eps_preserves_the_partition(
        coords in prop::collection::vec(arb_point(), 1..40),
        eps in 0.2..5.0,
        min_pts in 1usize..6,
    ) {
        let mut original = to_clusterable(&coords);
        cluster(&mut original, eps, min_pts).unwrap();

        let scaled_coords: Vec<(f64, f64)> = coords.iter().map(|&(x, y)| (x * 2.0, y * 2.0)).collect();
        let mut scaled = to_clusterable(&scaled_coords);
        cluster(&mut scaled, eps * 2.0, min_pts).unwrap();

        for i in 0..original.len() {
            for j in 0..original.len() {
                let same_before = original[i].cluster_id == original[j].cluster_id;
                let same_after = scaled[i].cluster_id == scaled[j].cluster_id;
                prop_assert_eq!(same_before, same_after);
            }
        }
    }

    #[test]
    fn returned_count_is_the_maximum_stamped_id(
        coords in prop::collection::vec(arb_point(), 1..50),
        eps in 0.1..5.0,
        min_pts in 1usize..6,
    ) {
        let mut points = to_clusterable(&coords);
        let count = cluster(&mut points, eps, min_pts).unwrap();
        let max_id = points.iter().map(|p| p.cluster_id).max().unwrap();
        prop_assert_eq!(count, max_id);
    }
}

#[test]
fn id_range_is_exactly_one_to_count_for_well_separated_blobs() {
    // Scoped to a case Phase 3 cannot touch: each blob is dense enough to be
    // fully resolved by Phase 2 alone, so no noise relabeling ever runs and
    // the id-range-gap quirk (see DESIGN.md) cannot trigger.
    let mut points = Vec::new();
    for blob in 0..5 {
        let cx = blob as f64 * 1000.0;
        for i in 0..6 {
            let jitter = i as f64 * 0.01;
            points.push(ClusterablePoint::new(Point::new(cx + jitter, jitter)));
        }
    }
    let count = cluster(&mut points, 0.5, 2).unwrap();
    assert_eq!(count, 5);
    let mut ids: Vec<u64> = points.iter().map(|p| p.cluster_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn id_generator_issues_a_strictly_increasing_sequence_from_one() {
    let mut gen = IdGenerator::new();
    let mut prev = 0;
    for _ in 0..1000 {
        let id = gen.next_id();
        assert!(id > prev);
        prev = id;
    }
    assert_eq!(gen.next_id(), 1001);
}
