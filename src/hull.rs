//! ## Convex Hull
//!
//! A 2D Graham scan. Used by the cluster engine to prune the expansion
//! frontier: only representatives lying on the hull of the points gathered so
//! far are allowed to pull in further neighbors.
//!
//! ### Example
//!
//! ```
//! use dbscan2d::geometry::Point;
//! use dbscan2d::hull::hull;
//!
//! let pts = [
//!     Point::new(0.0, 0.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(2.0, 2.0),
//!     Point::new(0.0, 2.0),
//!     Point::new(1.0, 1.0), // interior, dropped
//! ];
//! let h = hull(&pts);
//! assert_eq!(h.len(), 4);
//! ```

use crate::geometry::Point;
use std::cmp::Ordering;

/// Cross product of vectors `(p0, p1)` and `(p0, p2)`.
///
/// Positive when `p0 -> p1 -> p2` turns left (counterclockwise).
fn cross(p0: Point, p1: Point, p2: Point) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x)
}

fn is_left_turn(p0: Point, p1: Point, p2: Point) -> bool {
    cross(p0, p1, p2) > 0.0
}

/// Returns the anchor: smallest `y`, ties broken by smallest `x`.
fn anchor_index(points: &[Point]) -> usize {
    let mut best = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let b = points[best];
        if p.y < b.y || (p.y == b.y && p.x < b.x) {
            best = i;
        }
    }
    best
}

/// Sorts the non-anchor points by polar angle around the anchor and collapses
/// runs of points collinear with the anchor down to the farthest one.
fn rerange(anchor: Point, mut others: Vec<Point>) -> Vec<Point> {
    others.sort_by(|&a, &b| {
        let c = cross(anchor, a, b);
        if c > 0.0 {
            Ordering::Less
        } else if c < 0.0 {
            Ordering::Greater
        } else {
            anchor
                .dist_sq(&a)
                .partial_cmp(&anchor.dist_sq(&b))
                .unwrap_or(Ordering::Equal)
        }
    });

    let mut reranged: Vec<Point> = Vec::with_capacity(others.len());
    for p in others {
        if let Some(&last) = reranged.last() {
            if cross(anchor, last, p) == 0.0 {
                if anchor.dist_sq(&p) > anchor.dist_sq(&last) {
                    *reranged.last_mut().unwrap() = p;
                }
                continue;
            }
        }
        reranged.push(p);
    }
    reranged
}

/// Returns the convex hull of `points`, counterclockwise starting at the
/// anchor (smallest `y`, ties by smallest `x`).
///
/// Inputs of three points or fewer are returned unchanged. Duplicate inputs
/// and points collinear with the anchor and a kept hull edge are dropped, so
/// the result never has three collinear consecutive vertices.
pub fn hull(points: &[Point]) -> Vec<Point> {
    if points.len() <= 3 {
        return points.to_vec();
    }

    let anchor_idx = anchor_index(points);
    let anchor = points[anchor_idx];
    let others: Vec<Point> = points
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != anchor_idx)
        .map(|(_, &p)| p)
        .collect();

    let reranged = rerange(anchor, others);

    if reranged.len() < 2 {
        let mut result = vec![anchor];
        result.extend(reranged);
        return result;
    }

    let mut stack = vec![anchor, reranged[0], reranged[1]];
    for &p in &reranged[2..] {
        while stack.len() >= 2 {
            let top1 = stack[stack.len() - 1];
            let top2 = stack[stack.len() - 2];
            if is_left_turn(top2, top1, p) {
                break;
            }
            stack.pop();
        }
        stack.push(p);
    }
    stack
}
