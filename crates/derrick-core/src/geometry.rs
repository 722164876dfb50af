//! Polygon validation and containment.
//!
//! # Coordinate pairing convention
//!
//! Points here are `(x, y) = (latitude, longitude)`: the first number of
//! every flat coordinate pair is **latitude**, matching the portal's
//! `"lat, lon"` strings and the query parameter order of the read API. This
//! is the opposite of most geospatial tooling, where x is longitude. The
//! convention is load-bearing for stored points and for `/wells/in-polygon`
//! input alike; do not "correct" it when wiring in a standard geo library.
//!
//! Rings are validated as simple polygons: at least 3 distinct vertices,
//! nonzero area, no self-intersection. Containment is strict; a point
//! exactly on the boundary is outside.

use thiserror::Error;

/// A 2-D point in the `(latitude, longitude)` pairing convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// First pair member: latitude.
    pub x: f64,
    /// Second pair member: longitude.
    pub y: f64,
}

impl Point {
    /// Creates a point from `(latitude, longitude)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Why a flat coordinate list failed to validate as a polygon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolygonError {
    /// The flat list cannot be paired into 2-D points.
    #[error("odd number of coordinate values ({0}); expected lat/lon pairs")]
    OddCoordinateCount(usize),

    /// Fewer than three distinct vertices after closing the ring.
    #[error("a polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    /// All vertices are collinear; the ring encloses no area.
    #[error("degenerate ring: vertices are collinear")]
    DegenerateRing,

    /// Ring edges cross or touch each other.
    #[error("ring edges self-intersect")]
    SelfIntersecting,
}

/// A validated simple polygon, closed (last vertex equals the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    /// Builds a polygon from a flat `[lat, lon, lat, lon, …]` sequence.
    ///
    /// An open ring is closed by appending a copy of the first point.
    ///
    /// # Errors
    ///
    /// Returns a [`PolygonError`] naming the violation: odd input length,
    /// fewer than 3 distinct vertices, a zero-area ring, or
    /// self-intersecting edges.
    pub fn from_flat(values: &[f64]) -> Result<Self, PolygonError> {
        if values.len() % 2 != 0 {
            return Err(PolygonError::OddCoordinateCount(values.len()));
        }
        let points = values
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        Self::from_points(points)
    }

    /// Builds a polygon from vertices in the pairing convention.
    ///
    /// # Errors
    ///
    /// Same validity rules as [`Polygon::from_flat`].
    pub fn from_points(mut points: Vec<Point>) -> Result<Self, PolygonError> {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if first != last {
                points.push(first);
            }
        }

        let distinct = count_distinct(&points[..points.len().saturating_sub(1)]);
        if distinct < 3 {
            return Err(PolygonError::TooFewVertices(distinct));
        }
        if shoelace_area(&points) == 0.0 {
            return Err(PolygonError::DegenerateRing);
        }
        check_simple(&points)?;

        Ok(Self { ring: points })
    }

    /// The closed ring, last vertex equal to the first.
    #[must_use]
    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    /// Strict containment: `true` only for points in the interior.
    ///
    /// A point exactly on an edge or vertex is **not** contained. This is
    /// "contains", not "covers", and the tests pin it down.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        for (a, b) in self.edges() {
            if on_segment(a, b, p) {
                return false;
            }
        }
        // Even-odd ray cast along +x.
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let t = (p.y - a.y) / (b.y - a.y);
                let x_cross = a.x + t * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ring.windows(2).map(|w| (w[0], w[1]))
    }
}

fn count_distinct(points: &[Point]) -> usize {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }
    distinct.len()
}

fn shoelace_area(ring: &[Point]) -> f64 {
    let mut twice_area = 0.0;
    for w in ring.windows(2) {
        twice_area += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    twice_area / 2.0
}

/// Rejects rings whose non-adjacent edges intersect or touch. Adjacent edges
/// share exactly one endpoint by construction and are not tested against
/// each other.
fn check_simple(ring: &[Point]) -> Result<(), PolygonError> {
    let n = ring.len() - 1; // edge count
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if segments_intersect(ring[i], ring[i + 1], ring[j], ring[j + 1]) {
                return Err(PolygonError::SelfIntersecting);
            }
        }
    }
    Ok(())
}

/// Signed orientation of `c` relative to the directed line `a → b`.
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// `p` lies on the closed segment `a–b`.
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    orient(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Segment intersection including endpoint touches and collinear overlap.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}
