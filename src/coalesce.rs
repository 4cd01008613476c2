//! ## Duplicate Coalescer
//!
//! Groups input points that share identical coordinates into point-sets so
//! the rest of the pipeline only ever deals with unique representatives.
//! Exact duplicates are extremely common in real point clouds (repeated
//! sensor readings, rounded coordinates) and would otherwise distort
//! density counts and waste k-d tree nodes.

use crate::cluster::ClusterablePoint;
use crate::geometry::Point;

/// A group of input points sharing identical coordinates.
///
/// `coords` is what the k-d tree and hull routines index and manipulate;
/// `members` lists the indices, into the caller's original slice, of every
/// clusterable point carrying those coordinates. It exists only to propagate
/// a cluster id back onto the originals.
#[derive(Debug, Clone)]
pub struct PointSet {
    pub coords: Point,
    pub members: Vec<usize>,
}

impl PointSet {
    /// Number of input points this group represents.
    pub fn multiplicity(&self) -> usize {
        self.members.len()
    }
}

/// Groups `points` by identical coordinates.
///
/// Sorts point indices lexicographically by `(x, y)` (a stable sort, so
/// members of a group keep their relative input order) and sweeps the
/// result, starting a new group whenever the coordinates change.
pub fn coalesce(points: &[ClusterablePoint]) -> Vec<PointSet> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let pa = points[a].point;
        let pb = points[b].point;
        pa.x.partial_cmp(&pb.x)
            .unwrap()
            .then(pa.y.partial_cmp(&pb.y).unwrap())
    });

    let mut groups: Vec<PointSet> = Vec::new();
    for idx in order {
        let p = points[idx].point;
        match groups.last_mut() {
            Some(g) if g.coords == p => g.members.push(idx),
            _ => groups.push(PointSet {
                coords: p,
                members: vec![idx],
            }),
        }
    }
    groups
}
