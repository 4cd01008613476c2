//! ## Cluster Engine
//!
//! The density-based clustering core: coalesces duplicates, builds a static
//! k-d tree, and grows clusters outward from core representatives, pruning
//! the expansion frontier to its convex hull. A final noise-relabeling pass
//! folds leftover unlabeled points into secondary clusters.

use crate::coalesce::{coalesce, PointSet};
use crate::exceptions::ClusterError;
use crate::geometry::Point;
use crate::hull::hull;
use crate::id_gen::IdGenerator;
use crate::kd_tree::KdTree;
use std::collections::HashSet;
use tracing::{debug, info};

/// An input point carrying a cluster assignment.
///
/// `cluster_id` is `0` until labeled by [`cluster`]; on success it holds a
/// strictly positive id in `1..=cluster_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterablePoint {
    pub point: Point,
    pub cluster_id: u64,
}

impl ClusterablePoint {
    pub fn new(point: Point) -> Self {
        ClusterablePoint {
            point,
            cluster_id: 0,
        }
    }
}

fn validate(points: &[ClusterablePoint], eps: f64, min_pts: usize) -> Result<(), ClusterError> {
    if !(eps > 0.0) {
        return Err(ClusterError::InvalidArgument(
            "eps must be positive".to_string(),
        ));
    }
    if min_pts == 0 {
        return Err(ClusterError::InvalidArgument(
            "min_pts must be at least 1".to_string(),
        ));
    }
    for p in points {
        if !p.point.is_finite() {
            return Err(ClusterError::InvalidArgument(
                "coordinates must be finite".to_string(),
            ));
        }
        if p.cluster_id != 0 {
            return Err(ClusterError::InvalidArgument(
                "every point must have cluster_id == 0 on entry".to_string(),
            ));
        }
    }
    Ok(())
}

/// Runs the clustering algorithm over `points` in place.
///
/// On success every `points[i].cluster_id` is in `1..=cluster_count`, and
/// the returned value equals `cluster_count`. On failure the contents of
/// `points` are left partially labeled and must be treated as undefined.
pub fn cluster(
    points: &mut [ClusterablePoint],
    eps: f64,
    min_pts: usize,
) -> Result<u64, ClusterError> {
    validate(points, eps, min_pts)?;
    let eps_sq = eps * eps;
    info!(points = points.len(), eps, min_pts, "starting clustering");

    let groups: Vec<PointSet> = coalesce(points);
    info!(representatives = groups.len(), "coalesced input into point-sets");
    let entries: Vec<(Point, usize)> = groups
        .iter()
        .enumerate()
        .map(|(rep, g)| (g.coords, rep))
        .collect();
    let tree = KdTree::build(&entries);

    let mut group_cid: Vec<u64> = vec![0; groups.len()];
    let weight: Vec<usize> = groups.iter().map(|g| g.multiplicity()).collect();

    let mut visited: HashSet<usize> = HashSet::with_capacity(groups.len());
    let mut noise: Vec<usize> = Vec::new();
    let mut ids = IdGenerator::new();

    for rep in 0..groups.len() {
        if visited.contains(&rep) {
            continue;
        }
        visited.insert(rep);

        let neighbors = tree.within(groups[rep].coords, eps_sq);
        let total: usize = neighbors.iter().map(|&n| weight[n]).sum();

        if total < min_pts {
            noise.push(rep);
            continue;
        }

        let cid = ids.next_id();
        debug!(rep, cid, total, "core point found");
        stamp(&mut group_cid, points, &groups, rep, cid);

        let mut frontier: HashSet<usize> = neighbors.into_iter().filter(|&n| n != rep).collect();
        let mut hull_set = hull_set_of(&frontier, &groups);
        debug!(cid, frontier_size = frontier.len(), "initial frontier built");

        while let Some(&q) = frontier.iter().next() {
            frontier.remove(&q);

            if visited.insert(q) {
                if hull_set.contains(&q) {
                    let neighbors_q = tree.within(groups[q].coords, eps_sq);
                    let weighted: usize = neighbors_q.iter().map(|&n| weight[n]).sum();
                    debug!(rep = q, weighted, min_pts, "hull-set member processed");
                    if weighted >= min_pts {
                        for n in neighbors_q {
                            frontier.insert(n);
                        }
                    }
                    hull_set = hull_set_of(&frontier, &groups);
                }
            }

            if group_cid[q] == 0 {
                stamp(&mut group_cid, points, &groups, q, cid);
            }
        }
    }

    // Phase 3 — noise relabeling.
    let unlabeled: Vec<usize> = noise.into_iter().filter(|&r| group_cid[r] == 0).collect();
    info!(unlabeled = unlabeled.len(), "starting noise relabeling");
    if !unlabeled.is_empty() {
        let sub_entries: Vec<(Point, usize)> = unlabeled
            .iter()
            .map(|&rep| (groups[rep].coords, rep))
            .collect();
        let sub_tree = KdTree::build(&sub_entries);

        for &q in &unlabeled {
            if group_cid[q] != 0 {
                continue;
            }
            let cid = ids.next_id();
            let hits = sub_tree.within(groups[q].coords, eps_sq);
            debug!(rep = q, cid, hits = hits.len(), "noise center relabeled");
            for rep in hits {
                stamp(&mut group_cid, points, &groups, rep, cid);
            }
        }
    }

    info!(cluster_count = ids.last_issued(), "clustering finished");
    Ok(ids.last_issued())
}

fn hull_set_of(frontier: &HashSet<usize>, groups: &[PointSet]) -> HashSet<usize> {
    if frontier.is_empty() {
        return HashSet::new();
    }
    let reps: Vec<usize> = frontier.iter().copied().collect();
    let pts: Vec<Point> = reps.iter().map(|&r| groups[r].coords).collect();
    let vertices = hull(&pts);
    reps.into_iter()
        .zip(pts)
        .filter(|(_, p)| vertices.contains(p))
        .map(|(r, _)| r)
        .collect()
}

fn stamp(
    group_cid: &mut [u64],
    points: &mut [ClusterablePoint],
    groups: &[PointSet],
    rep: usize,
    cid: u64,
) {
    group_cid[rep] = cid;
    for &member in &groups[rep].members {
        points[member].cluster_id = cid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<ClusterablePoint> {
        coords
            .iter()
            .map(|&(x, y)| ClusterablePoint::new(Point::new(x, y)))
            .collect()
    }

    #[test]
    fn rejects_non_positive_eps() {
        let mut p = pts(&[(0.0, 0.0)]);
        assert!(matches!(
            cluster(&mut p, 0.0, 1),
            Err(ClusterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_zero_min_pts() {
        let mut p = pts(&[(0.0, 0.0)]);
        assert!(matches!(
            cluster(&mut p, 1.0, 0),
            Err(ClusterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut p = pts(&[(f64::NAN, 0.0)]);
        assert!(matches!(
            cluster(&mut p, 1.0, 1),
            Err(ClusterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_prelabeled_points() {
        let mut p = pts(&[(0.0, 0.0)]);
        p[0].cluster_id = 1;
        assert!(matches!(
            cluster(&mut p, 1.0, 1),
            Err(ClusterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn single_point_with_min_pts_one_forms_its_own_cluster() {
        let mut p = pts(&[(0.0, 0.0)]);
        let count = cluster(&mut p, 1.0, 1).unwrap();
        assert_eq!(count, 1);
        assert_eq!(p[0].cluster_id, 1);
    }

    #[test]
    fn two_tight_clusters_separated_by_a_gap() {
        let mut p = pts(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (0.0, 0.1),
            (10.0, 10.0),
            (10.1, 10.0),
            (10.0, 10.1),
        ]);
        let count = cluster(&mut p, 0.5, 2).unwrap();
        assert_eq!(count, 2);
        let first_group_id = p[0].cluster_id;
        let second_group_id = p[3].cluster_id;
        assert_ne!(first_group_id, second_group_id);
        for i in 0..3 {
            assert_eq!(p[i].cluster_id, first_group_id);
        }
        for i in 3..6 {
            assert_eq!(p[i].cluster_id, second_group_id);
        }
    }

    #[test]
    fn isolated_point_becomes_its_own_noise_cluster() {
        let mut p = pts(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (0.0, 0.1),
            (0.1, 0.1),
            (1000.0, 1000.0),
        ]);
        let count = cluster(&mut p, 0.3, 3).unwrap();
        assert_eq!(count, 2);
        assert!(p[4].cluster_id > 0);
        assert_ne!(p[4].cluster_id, p[0].cluster_id);
    }

    #[test]
    fn all_points_receive_a_positive_cluster_id() {
        let mut p = pts(&[
            (0.0, 0.0),
            (5.0, 5.0),
            (-3.0, 7.0),
            (100.0, -100.0),
            (0.0, 0.0),
        ]);
        cluster(&mut p, 0.01, 1).unwrap();
        for point in &p {
            assert!(point.cluster_id > 0);
        }
    }

    #[test]
    fn exact_duplicates_end_up_in_the_same_cluster() {
        let mut p = pts(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (50.0, 50.0)]);
        cluster(&mut p, 0.5, 2).unwrap();
        assert_eq!(p[0].cluster_id, p[1].cluster_id);
        assert_eq!(p[1].cluster_id, p[2].cluster_id);
    }

    #[test]
    fn returned_count_equals_max_observed_id() {
        let mut p = pts(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (5.0, 5.0),
            (5.1, 5.0),
            (9.0, 9.0),
        ]);
        let count = cluster(&mut p, 0.3, 2).unwrap();
        let max_id = p.iter().map(|pt| pt.cluster_id).max().unwrap();
        assert_eq!(count, max_id);
    }

    #[test]
    fn dense_ring_is_a_single_cluster_despite_hull_pruning() {
        let mut coords = Vec::new();
        for i in 0..24 {
            let theta = (i as f64) * std::f64::consts::TAU / 24.0;
            coords.push((10.0 * theta.cos(), 10.0 * theta.sin()));
        }
        let mut p = pts(&coords);
        let count = cluster(&mut p, 3.0, 2).unwrap();
        assert_eq!(count, 1);
        for point in &p {
            assert_eq!(point.cluster_id, 1);
        }
    }
}
