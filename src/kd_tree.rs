//! ## Static K-d Tree
//!
//! A build-once, balanced 2D k-d tree over point-set representatives. Each
//! leaf carries the index (the "representative id") of the point-set it was
//! built from, rather than a pointer, so the tree and the sets that key off
//! its results (the cluster engine's visited/frontier/hull sets) can use a
//! plain `usize` handle instead of hashing by address or by coordinate.
//!
//! ### Example
//!
//! ```
//! use dbscan2d::geometry::Point;
//! use dbscan2d::kd_tree::KdTree;
//!
//! let entries = vec![
//!     (Point::new(0.0, 0.0), 0),
//!     (Point::new(1.0, 1.0), 1),
//!     (Point::new(5.0, 5.0), 2),
//! ];
//! let tree = KdTree::build(&entries);
//! let found = tree.within(Point::new(0.0, 0.0), 4.0);
//! assert_eq!(found.len(), 2);
//! ```

use crate::exceptions::ClusterError;
use crate::geometry::{Axis, Point, Rectangle};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use tracing::{debug, info};

/// A node in the k-d tree: a representative point, its id, and two owned
/// children. There are no parent back-pointers — the range-query algorithm
/// only ever needs to walk downward, so the tree is a pure ownership
/// hierarchy (see the design notes on why back-edges were dropped).
#[derive(Debug)]
struct KdNode {
    point: Point,
    rep: usize,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

/// A balanced, build-once k-d tree over 2D points.
///
/// Built via [`KdTree::build`] (or [`KdTree::build_seeded`] for a
/// reproducible shuffle). Dynamic insertion and deletion are intentionally
/// unimplemented; see [`KdTree::insert`] / [`KdTree::delete`].
#[derive(Debug)]
pub struct KdTree {
    root: Option<Box<KdNode>>,
    rect: Option<Rectangle>,
    len: usize,
}

impl Default for KdTree {
    fn default() -> Self {
        KdTree {
            root: None,
            rect: None,
            len: 0,
        }
    }
}

impl KdTree {
    /// Builds a tree from `entries` (point, representative id), seeding the
    /// pre-build shuffle from the wall clock.
    pub fn build(entries: &[(Point, usize)]) -> Self {
        Self::build_seeded(entries, default_seed())
    }

    /// Builds a tree from `entries`, seeding the pre-build shuffle
    /// deterministically. Exact duplicate coordinates are coalesced down to
    /// one representative before the shuffle, keeping the first one seen.
    pub fn build_seeded(entries: &[(Point, usize)], seed: u64) -> Self {
        info!(entries = entries.len(), seed, "building k-d tree");
        let mut deduped = dedup_by_coords(entries);
        debug!(unique = deduped.len(), "deduplicated entries");
        if deduped.is_empty() {
            return Self::default();
        }
        shuffle(&mut deduped, seed);

        let mut rect = Rectangle::from_point(deduped[0].0);
        for (p, _) in &deduped {
            rect.enlarge_to(p);
        }
        let len = deduped.len();
        let root = build_rec(&mut deduped, 0);
        debug!(len, "k-d tree built");

        KdTree {
            root,
            rect: Some(rect),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the representative ids of every point within `radius_sq` of
    /// `query`, in no guaranteed order.
    pub fn within(&self, query: Point, radius_sq: f64) -> Vec<usize> {
        self.within_with_dist(query, radius_sq)
            .into_iter()
            .map(|(rep, _)| rep)
            .collect()
    }

    /// Like [`KdTree::within`], but sorted by ascending distance to `query`.
    pub fn within_sorted(&self, query: Point, radius_sq: f64) -> Vec<usize> {
        let mut found = self.within_with_dist(query, radius_sq);
        found.sort_by_key(|&(_, d)| OrderedFloat(d));
        found.into_iter().map(|(rep, _)| rep).collect()
    }

    fn within_with_dist(&self, query: Point, radius_sq: f64) -> Vec<(usize, f64)> {
        let mut found = Vec::new();
        if let (Some(root), Some(rect)) = (&self.root, &self.rect) {
            within_rec(root, query, radius_sq, 0, *rect, &mut found);
        }
        debug!(
            query.x = query.x,
            query.y = query.y,
            radius_sq,
            hits = found.len(),
            "range query"
        );
        found
    }

    /// Dynamic insertion is not supported by this static tree.
    pub fn insert(&mut self, _point: Point, _rep: usize) -> Result<(), ClusterError> {
        Err(ClusterError::NotSupported(
            "insert is not supported by the static k-d tree",
        ))
    }

    /// Dynamic deletion is not supported by this static tree.
    pub fn delete(&mut self, _point: &Point) -> Result<bool, ClusterError> {
        Err(ClusterError::NotSupported(
            "delete is not supported by the static k-d tree",
        ))
    }
}

fn dedup_by_coords(entries: &[(Point, usize)]) -> Vec<(Point, usize)> {
    let mut seen = HashMap::with_capacity(entries.len());
    let mut out = Vec::with_capacity(entries.len());
    for &(p, rep) in entries {
        if seen.insert(p.key(), ()).is_none() {
            out.push((p, rep));
        }
    }
    out
}

fn default_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn shuffle(entries: &mut [(Point, usize)], seed: u64) {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    entries.shuffle(&mut rng);
}

/// Selects `entries` in place so that `entries[k]` holds the element that
/// would occupy position `k` if the slice were sorted by `axis`, with every
/// earlier element `<=` it and every later element `>=` it (Hoare-style
/// quickselect, linear expected time).
fn quickselect(entries: &mut [(Point, usize)], axis: Axis, mut k: usize) {
    let mut entries = entries;
    loop {
        let len = entries.len();
        if len <= 1 {
            return;
        }
        let pivot_val = axis.coord(&entries[len - 1].0);
        let mut store = 0usize;
        for i in 0..len - 1 {
            if axis.coord(&entries[i].0) <= pivot_val {
                entries.swap(i, store);
                store += 1;
            }
        }
        entries.swap(store, len - 1);

        if k == store {
            return;
        } else if k < store {
            entries = &mut entries[..store];
        } else {
            k -= store + 1;
            entries = &mut entries[store + 1..];
        }
    }
}

fn build_rec(entries: &mut [(Point, usize)], depth: usize) -> Option<Box<KdNode>> {
    if entries.is_empty() {
        return None;
    }
    let axis = Axis::at_depth(depth);
    let mid = entries.len() / 2;
    quickselect(entries, axis, mid);

    let (left, rest) = entries.split_at_mut(mid);
    let (median, right) = rest.split_first_mut().expect("non-empty slice");

    let left_node = build_rec(left, depth + 1);
    let right_node = build_rec(right, depth + 1);

    Some(Box::new(KdNode {
        point: median.0,
        rep: median.1,
        left: left_node,
        right: right_node,
    }))
}

fn within_rec(
    node: &KdNode,
    query: Point,
    radius_sq: f64,
    depth: usize,
    rect: Rectangle,
    found: &mut Vec<(usize, f64)>,
) {
    if rect.min_dist_sq_to(&query) > radius_sq {
        return;
    }

    let d = query.dist_sq(&node.point);
    if d <= radius_sq {
        found.push((node.rep, d));
    }

    let axis = Axis::at_depth(depth);
    let pivot = axis.coord(&node.point);

    if let Some(ref left) = node.left {
        if let Ok(lrect) = rect.split_lower(axis, pivot) {
            within_rec(left, query, radius_sq, depth + 1, lrect, found);
        }
    }
    if let Some(ref right) = node.right {
        if let Ok(rrect) = rect.split_upper(axis, pivot) {
            within_rec(right, query, radius_sq, depth + 1, rrect, found);
        }
    }
}
