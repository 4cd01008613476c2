//! ## Input Reader
//!
//! Reads a dense array of points from a text file of `x, y` pairs, one per
//! line. Blank or malformed lines fail the whole read rather than being
//! skipped, matching the strict `fscanf("%lg, %lg\n", ...)` behavior this
//! format is modeled on.

use crate::geometry::Point;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Reads `path` into a vector of points.
///
/// Each non-empty line must parse as `<float>, <float>`; any other line
/// (including a blank one) is an error.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input file {}", path.display()))?;

    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            return Err(anyhow!("line {}: blank line is not a valid point", lineno + 1));
        }
        let (xs, ys) = line
            .split_once(',')
            .ok_or_else(|| anyhow!("line {}: expected \"x, y\"", lineno + 1))?;
        let x: f64 = xs
            .trim()
            .parse()
            .with_context(|| format!("line {}: invalid x coordinate", lineno + 1))?;
        let y: f64 = ys
            .trim()
            .parse()
            .with_context(|| format!("line {}: invalid y coordinate", lineno + 1))?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}
