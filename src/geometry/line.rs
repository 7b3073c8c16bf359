//! Line segments and the orientation predicates built on them
//!
//! The tricky part of the geometry layer: segment intersection has to count a
//! shared endpoint exactly once, and merged boundary walls are frequently
//! exactly collinear, so the parallel case needs its own branch.

use serde::{Deserialize, Serialize};

use super::point::{Point, Velocity};
use super::polygon::{Polygon, Rectangle};
use crate::consts::TOLERANCE;
use crate::error::{PhysicsError, PhysicsResult};
use crate::sign;

/// `p3` lies strictly clockwise of the directed line `p1 -> p2`
#[inline]
pub fn is_clockwise(p1: Point, p2: Point, p3: Point) -> bool {
    (p2 - p1).cross(p3 - p1) > 0.0
}

/// `p3` lies clockwise of, or exactly on, the directed line `p1 -> p2`
#[inline]
pub fn is_clockwise_or_collinear(p1: Point, p2: Point, p3: Point) -> bool {
    (p2 - p1).cross(p3 - p1) >= 0.0
}

/// Half of the segment intersection test: `second` straddles the infinite
/// line through `first` (or touches it).
fn straddles(first: &Line, second: &Line) -> bool {
    let (a, b) = (first.start, first.end);
    is_clockwise(a, b, second.start) != is_clockwise_or_collinear(a, b, second.end)
        || is_clockwise_or_collinear(a, b, second.start) != is_clockwise(a, b, second.end)
}

/// All four endpoints lie within tolerance of one infinite line
fn fully_collinear(first: &Line, second: &Line) -> bool {
    let near_line = |line: &Line, p: Point| {
        line.direction().normalize().cross(p - line.start).abs() <= TOLERANCE
    };
    near_line(first, second.start)
        && near_line(first, second.end)
        && near_line(second, first.start)
        && near_line(second, first.end)
}

/// Closed 1D interval overlap
fn ranges_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0.min(a1) <= b0.max(b1) && b0.min(b1) <= a0.max(a1)
}

/// A directed line segment; equality ignores direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub const fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn middle(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    /// Angle of the segment in radians
    pub fn angle(&self) -> f64 {
        self.direction().angle()
    }

    /// Unit normal (direction rotated a quarter turn); zero for a degenerate segment
    pub fn normal(&self) -> Point {
        self.direction().perp().normalize()
    }

    /// Axis-aligned bounding rectangle
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_corners(self.start, self.end)
    }

    /// The end of the segment that is not `p`
    pub fn other_end(&self, p: Point) -> PhysicsResult<Point> {
        if p == self.start {
            Ok(self.end)
        } else if p == self.end {
            Ok(self.start)
        } else {
            Err(PhysicsError::NotAnEndpoint(p))
        }
    }

    /// Segment intersection test. Touching at an endpoint counts.
    ///
    /// Each segment must straddle the other. When all four endpoints are
    /// collinear the orientation tests only see rounding residue, so the
    /// segments intersect only if their extents overlap.
    pub fn is_intersecting(&self, other: &Line) -> bool {
        if fully_collinear(self, other) {
            return ranges_overlap(self.start.x(), self.end.x(), other.start.x(), other.end.x())
                && ranges_overlap(self.start.y(), self.end.y(), other.start.y(), other.end.y());
        }
        straddles(self, other) && straddles(other, self)
    }

    /// Intersection point of two segments, if there is exactly one
    pub fn intersection_with(&self, other: &Line) -> Option<Point> {
        if !self.is_intersecting(other) {
            return None;
        }

        if self.direction().cross(other.direction()).abs() > TOLERANCE {
            // Implicit form a·x + b·y = c for each line
            let a1 = self.end.y() - self.start.y();
            let b1 = self.start.x() - self.end.x();
            let c1 = a1 * self.start.x() + b1 * self.start.y();
            let a2 = other.end.y() - other.start.y();
            let b2 = other.start.x() - other.end.x();
            let c2 = a2 * other.start.x() + b2 * other.start.y();

            let det = a1 * b2 - a2 * b1;
            return Some(Point::new(
                (b2 * c1 - b1 * c2) / det,
                (a1 * c2 - a2 * c1) / det,
            ));
        }

        // Parallel: the only single intersection is a shared endpoint with the
        // segments pointing away from each other.
        for shared in [self.start, self.end] {
            for other_shared in [other.start, other.end] {
                if shared != other_shared {
                    continue;
                }
                let (Ok(away), Ok(other_away)) =
                    (self.other_end(shared), other.other_end(other_shared))
                else {
                    continue;
                };
                if points_apart(shared, away, other_away) {
                    return Some(shared);
                }
            }
        }
        None
    }

    /// Distance from `point` to the infinite line through this segment.
    ///
    /// Callers that need segment distance must check that the perpendicular
    /// foot falls inside the segment. A degenerate segment measures to its start.
    pub fn distance(&self, point: Point) -> f64 {
        let length = self.length();
        if length <= TOLERANCE {
            return self.start.distance(point);
        }
        let d = self.direction();
        let c = self.start.x() * self.end.y() - self.end.x() * self.start.y();
        (d.y() * point.x() - d.x() * point.y() - c).abs() / length
    }

    /// Whether the perpendicular foot of `point` lands inside the segment.
    /// Exactly-perpendicular ties count as inside.
    pub fn projects_inside(&self, point: Point) -> bool {
        let d = self.direction();
        d.dot(point - self.start) >= 0.0 && d.dot(self.end - point) >= 0.0
    }

    /// The shared endpoint, if the segments share exactly one
    fn shared_endpoint(&self, other: &Line) -> Option<Point> {
        if self == other {
            return None;
        }
        [self.start, self.end]
            .into_iter()
            .find(|p| *p == other.start || *p == other.end)
    }

    /// Two segments merge when they share exactly one endpoint and continue
    /// each other in a straight line from it.
    pub fn is_mergeable(&self, other: &Line) -> bool {
        let Some(shared) = self.shared_endpoint(other) else {
            return false;
        };
        let (Ok(away), Ok(other_away)) = (self.other_end(shared), other.other_end(shared)) else {
            return false;
        };
        let dir1 = away - shared;
        let dir2 = other_away - shared;
        dir1.cross(dir2).abs() < TOLERANCE && dir1.dot(dir2) < 0.0
    }

    /// Segment spanning the two non-shared endpoints
    pub fn merge(&self, other: &Line) -> PhysicsResult<Line> {
        let not_mergeable = || PhysicsError::NotMergeable {
            first: *self,
            second: *other,
        };
        if !self.is_mergeable(other) {
            return Err(not_mergeable());
        }
        let shared = self.shared_endpoint(other).ok_or_else(not_mergeable)?;
        Ok(Line::new(self.other_end(shared)?, other.other_end(shared)?))
    }

    /// Intersection with the polygon's edges closest to this segment's start
    pub fn closest_intersection_to_start(&self, polygon: &Polygon) -> Option<Point> {
        polygon
            .intersection_points(self)
            .into_iter()
            .min_by(|a, b| a.distance(self.start).total_cmp(&b.distance(self.start)))
    }

    /// Elastic reflection law.
    ///
    /// The normal component of `velocity` is replaced by one of the same
    /// magnitude (scaled by `elasticity`) pointing toward the side of the line
    /// that `point` is on. The tangential component is kept, and a grazing
    /// contact leaves the velocity untouched.
    pub fn reflect(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity {
        let normal = self.normal();
        let velocity_proj = normal * normal.dot(velocity);
        let center_proj = (normal * normal.dot(point - self.start)).normalize();
        center_proj * (elasticity * velocity_proj.length()) - velocity_proj + velocity
    }
}

/// From the shared point, the two far ends lie in different directions along
/// at least one axis
fn points_apart(shared: Point, away: Point, other_away: Point) -> bool {
    sign(away.x() - shared.x()) != sign(other_away.x() - shared.x())
        || sign(away.y() - shared.y()) != sign(other_away.y() - shared.y())
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}
