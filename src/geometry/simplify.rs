//! Ramer-Douglas-Peucker polyline simplification.
//!
//! Catchment outlines come back from the delineation service with one
//! vertex per raster cell edge, which is far denser than a map display or
//! an exported file needs. This routine thins a polyline to the points
//! that matter: a point survives only while it deviates from the chord of
//! its neighbours by strictly more than the tolerance.
//!
//! The tolerance is in input coordinate units (degrees for lon/lat data).
//! The output is always a subsequence of the input with both endpoints
//! intact, so a simplified ring drops straight back into the GeoJSON it
//! came from.

use super::GeometryError;
use crate::geojson::Position;

/// Distance from `point` to the segment `start`..`end`.
///
/// Uses the projection formulation: when the foot of the perpendicular
/// falls outside the segment, the distance is measured to the nearer
/// endpoint instead of the infinite line. A zero-length segment degrades
/// to plain point distance.
fn segment_distance(point: Position, start: Position, end: Position) -> f64 {
    let (px, py) = point;
    let (ax, ay) = start;
    let (bx, by) = end;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        // Coincident endpoints: no direction to project onto.
        let ex = px - ax;
        let ey = py - ay;
        return (ex * ex + ey * ey).sqrt();
    }

    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let (nx, ny) = if t < 0.0 {
        (ax, ay)
    } else if t > 1.0 {
        (bx, by)
    } else {
        (ax + t * dx, ay + t * dy)
    };

    let ex = px - nx;
    let ey = py - ny;
    (ex * ex + ey * ey).sqrt()
}

/// Simplify a polyline, keeping every point that deviates from the chord
/// between its retained neighbours by more than `tolerance`.
///
/// The first and last input points are always retained, and the output is
/// a subsequence of the input. A tolerance of `0.0` removes only points
/// that lie exactly on the chord.
///
/// Fails with [`GeometryError::InvalidArgument`] when the tolerance is
/// negative or not finite, or when the input has fewer than two points.
/// A two-point input is returned unchanged.
pub fn simplify(points: &[Position], tolerance: f64) -> Result<Vec<Position>, GeometryError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(GeometryError::InvalidArgument {
            reason: format!("tolerance must be a non-negative finite number, got {tolerance}"),
        });
    }
    if points.len() < 2 {
        return Err(GeometryError::InvalidArgument {
            reason: format!("polyline must have at least 2 points, got {}", points.len()),
        });
    }
    if points.len() == 2 {
        return Ok(points.to_vec());
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    // Explicit work stack instead of recursion, so a pathological zig-zag
    // cannot overflow the call stack. The output only depends on which
    // indices get marked, so processing order does not matter.
    let mut ranges = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = ranges.pop() {
        if end - start < 2 {
            continue;
        }

        let mut max_distance = 0.0_f64;
        let mut max_index = start;
        for i in start + 1..end {
            let distance = segment_distance(points[i], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                max_index = i;
            }
        }

        if max_distance > tolerance {
            keep[max_index] = true;
            ranges.push((max_index, end));
            ranges.push((start, max_index));
        }
    }

    Ok(points
        .iter()
        .zip(&keep)
        .filter_map(|(&point, &kept)| kept.then_some(point))
        .collect())
}

/// Simplify one closed polygon ring.
///
/// A valid GeoJSON ring needs at least four positions (three corners plus
/// the closing repeat). If simplification collapses a ring below that, the
/// original ring is returned instead, so aggressive tolerances degrade a
/// polygon's detail but never its validity.
pub fn simplify_ring(ring: &[Position], tolerance: f64) -> Result<Vec<Position>, GeometryError> {
    let simplified = simplify(ring, tolerance)?;
    if simplified.len() < 4 {
        return Ok(ring.to_vec());
    }
    Ok(simplified)
}
