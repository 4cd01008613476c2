//! ## Geometry Primitives
//!
//! Value types shared by the convex hull and k-d tree modules: a 2D point, a
//! closed interval over one axis, and an axis-aligned rectangle built from two
//! intervals. None of these types allocate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in 2D space.
///
/// Distance between points is always the **squared** Euclidean distance;
/// nothing in this crate takes a square root.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn dist_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// True if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// A bit-pattern key suitable for exact-equality hash sets.
    ///
    /// Coordinates are never NaN in this crate (checked at the public entry
    /// point), so bitwise equality here coincides with `==`.
    pub(crate) fn key(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

/// Returns true if `a` and `b` have identical coordinates.
pub fn equals(a: &Point, b: &Point) -> bool {
    a == b
}

/// The axis a k-d tree node splits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axis used at a given tree depth. The root splits on `Y`, alternating
    /// thereafter; this matches the reference implementation's convention.
    pub fn at_depth(depth: usize) -> Axis {
        if depth % 2 == 0 {
            Axis::Y
        } else {
            Axis::X
        }
    }

    pub fn flip(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub fn coord(self, p: &Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// A closed range `[lower, upper]` over the reals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Interval { lower, upper }
    }

    pub fn from_point(p: f64) -> Self {
        Interval { lower: p, upper: p }
    }

    pub fn contains(&self, p: f64) -> bool {
        p >= self.lower && p <= self.upper
    }

    /// Extends the interval just enough to contain `p`. No-op if already
    /// contained.
    pub fn enlarge_to(&mut self, p: f64) {
        if p < self.lower {
            self.lower = p;
        } else if p > self.upper {
            self.upper = p;
        }
    }
}

/// Marker error returned when a rectangle split's pivot falls outside the
/// interval on the requested side. Never surfaced past the k-d tree: a failed
/// split just prunes that subtree.
#[derive(Debug, Clone, Copy)]
pub struct OutOfRange;

/// An axis-aligned rectangle, one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    pub x: Interval,
    pub y: Interval,
}

impl Rectangle {
    /// The degenerate rectangle containing exactly one point.
    pub fn from_point(p: Point) -> Self {
        Rectangle {
            x: Interval::from_point(p.x),
            y: Interval::from_point(p.y),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }

    pub fn enlarge_to(&mut self, p: &Point) {
        self.x.enlarge_to(p.x);
        self.y.enlarge_to(p.y);
    }

    /// Minimum squared distance from the rectangle to `p`: zero if `p` is
    /// inside, otherwise the sum of squared axis gaps.
    pub fn min_dist_sq_to(&self, p: &Point) -> f64 {
        let dx = axis_gap(&self.x, p.x);
        let dy = axis_gap(&self.y, p.y);
        dx * dx + dy * dy
    }

    fn interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn with_interval(&self, axis: Axis, itv: Interval) -> Rectangle {
        let mut r = *self;
        match axis {
            Axis::X => r.x = itv,
            Axis::Y => r.y = itv,
        }
        r
    }

    /// The sub-rectangle on the "upper" side of `pivot` along `axis`.
    ///
    /// Fails with `OutOfRange` if `pivot` lies beyond the existing interval's
    /// upper bound (there would be nothing left on that side).
    pub fn split_upper(&self, axis: Axis, pivot: f64) -> Result<Rectangle, OutOfRange> {
        let itv = self.interval(axis);
        if itv.upper < pivot {
            return Err(OutOfRange);
        }
        let mut new_itv = itv;
        if new_itv.lower < pivot {
            new_itv.lower = pivot;
        }
        Ok(self.with_interval(axis, new_itv))
    }

    /// The sub-rectangle on the "lower" side of `pivot` along `axis`.
    ///
    /// Fails with `OutOfRange` if `pivot` lies beyond the existing interval's
    /// lower bound.
    pub fn split_lower(&self, axis: Axis, pivot: f64) -> Result<Rectangle, OutOfRange> {
        let itv = self.interval(axis);
        if itv.lower > pivot {
            return Err(OutOfRange);
        }
        let mut new_itv = itv;
        if new_itv.upper > pivot {
            new_itv.upper = pivot;
        }
        Ok(self.with_interval(axis, new_itv))
    }
}

fn axis_gap(itv: &Interval, p: f64) -> f64 {
    if p < itv.lower {
        itv.lower - p
    } else if p > itv.upper {
        p - itv.upper
    } else {
        0.0
    }
}
