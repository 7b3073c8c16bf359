//! The moving ball shape
//!
//! A circle remembers where it was at the start of the tick (`last_center`)
//! so the path it swept can be tested against thin walls, not just the
//! sampled end position.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::line::Line;
use super::point::{Point, Velocity};
use super::polygon::{Polygon, Rectangle};

/// How a circle touches a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionType {
    NoIntersection,
    /// Perpendicular foot inside the segment, within one radius
    OnTop,
    /// Nearest feature is an endpoint, within one radius
    OnVertex,
    /// The path swept this tick crosses the segment
    MovementIntersection,
}

impl IntersectionType {
    /// Contacts against the face of a segment, as opposed to its endpoints
    pub fn is_face(self) -> bool {
        matches!(self, Self::OnTop | Self::MovementIntersection)
    }
}

/// A moving circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    center: Point,
    radius: f64,
    velocity: Velocity,
    /// Center at the start of the current tick's motion
    last_center: Point,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            velocity: Point::ZERO,
            last_center: center,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    #[inline]
    pub fn last_center(&self) -> Point {
        self.last_center
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Advance the center by one tick of `dt` seconds. `last_center` is left
    /// alone until the tick's collisions are resolved.
    pub fn move_one_step(&mut self, dt: f64) {
        self.center += self.velocity.per_step(dt);
    }

    /// Start the next tick from the current position
    pub fn update_last_center(&mut self) {
        self.last_center = self.center;
    }

    /// Undo this tick's motion
    pub fn rewind(&mut self) {
        self.center = self.last_center;
    }

    /// Path swept since the start of the tick
    pub fn movement(&self) -> Line {
        Line::new(self.last_center, self.center)
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn bounds(&self) -> Rectangle {
        let r = Point::new(self.radius, self.radius);
        Rectangle::from_corners(self.center - r, self.center + r)
    }

    /// Strict containment
    pub fn contains(&self, point: Point) -> bool {
        point.distance(self.center) < self.radius
    }

    pub fn intersects_circle(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// Regular polygon approximation with `accuracy` vertices (at least 3)
    pub fn to_polygon(&self, accuracy: usize) -> Polygon {
        let n = accuracy.max(3);
        let vertices = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                self.center + Point::from_angle_and_speed(angle, self.radius)
            })
            .collect();
        Polygon::from_vertices(vertices)
    }

    /// Classify how this circle touches `line`.
    ///
    /// The swept path is checked first so a ball that skipped clean over a
    /// thin edge in one tick is still caught. Otherwise the nearest feature
    /// is the segment face when the perpendicular foot lands inside the
    /// segment (exact right angles count as inside), and an endpoint if not.
    pub fn intersection_type(&self, line: &Line) -> IntersectionType {
        if self.movement().is_intersecting(line) {
            return IntersectionType::MovementIntersection;
        }

        let result = if line.projects_inside(self.center) {
            if line.distance(self.center) <= self.radius {
                IntersectionType::OnTop
            } else {
                IntersectionType::NoIntersection
            }
        } else {
            let nearest = line
                .start()
                .distance(self.center)
                .min(line.end().distance(self.center));
            if nearest <= self.radius {
                IntersectionType::OnVertex
            } else {
                IntersectionType::NoIntersection
            }
        };
        log::trace!("circle at {:?} vs {:?}: {:?}", self.center, line, result);
        result
    }

    pub fn is_intersecting_line(&self, line: &Line) -> bool {
        self.intersection_type(line) != IntersectionType::NoIntersection
    }

    /// First edge of `polygon` this circle touches
    pub fn first_intersecting_edge(&self, polygon: &Polygon) -> Option<Line> {
        polygon
            .edges()
            .into_iter()
            .find(|edge| self.is_intersecting_line(edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wall() -> Line {
        Line::from_coords(0.0, 150.0, 200.0, 150.0)
    }

    #[test]
    fn test_on_top() {
        let ball = Circle::new(Point::new(100.0, 142.0), 10.0);
        assert_eq!(ball.intersection_type(&wall()), IntersectionType::OnTop);
    }

    #[test]
    fn test_on_vertex() {
        let ball = Circle::new(Point::new(206.0, 146.0), 10.0);
        assert_eq!(ball.intersection_type(&wall()), IntersectionType::OnVertex);
    }

    #[test]
    fn test_no_intersection() {
        let wall = wall();
        // Above the face
        let ball = Circle::new(Point::new(100.0, 100.0), 10.0);
        assert_eq!(ball.intersection_type(&wall), IntersectionType::NoIntersection);
        // Beyond the end, close to the infinite line but far from the endpoint
        let ball = Circle::new(Point::new(260.0, 149.0), 10.0);
        assert_eq!(ball.intersection_type(&wall), IntersectionType::NoIntersection);
    }

    #[test]
    fn test_exact_perpendicular_foot_is_on_top() {
        // Foot lands exactly on the endpoint: a right angle, so face contact
        let ball = Circle::new(Point::new(200.0, 145.0), 10.0);
        assert_eq!(ball.intersection_type(&wall()), IntersectionType::OnTop);
    }

    #[test]
    fn test_tunneling_is_caught() {
        let line = Line::from_coords(-50.0, 50.0, 50.0, 50.0);
        let mut ball =
            Circle::new(Point::new(0.0, 0.0), 5.0).with_velocity(Point::new(0.0, 100.0));

        // Neither frame on its own touches the line
        assert_eq!(ball.intersection_type(&line), IntersectionType::NoIntersection);
        let end_frame = Circle::new(Point::new(0.0, 100.0), 5.0);
        assert_eq!(end_frame.intersection_type(&line), IntersectionType::NoIntersection);

        ball.move_one_step(1.0);
        assert_eq!(ball.center(), Point::new(0.0, 100.0));
        assert_eq!(ball.last_center(), Point::new(0.0, 0.0));
        assert_eq!(
            ball.intersection_type(&line),
            IntersectionType::MovementIntersection
        );
    }

    #[test]
    fn test_rewind_and_update_last_center() {
        let mut ball =
            Circle::new(Point::new(0.0, 0.0), 5.0).with_velocity(Point::new(30.0, 0.0));
        ball.move_one_step(0.5);
        assert_eq!(ball.center(), Point::new(15.0, 0.0));
        ball.rewind();
        assert_eq!(ball.center(), Point::new(0.0, 0.0));
        ball.move_one_step(1.0);
        ball.update_last_center();
        assert_eq!(ball.last_center(), Point::new(30.0, 0.0));
    }

    #[test]
    fn test_shape_queries() {
        let ball = Circle::new(Point::new(10.0, 10.0), 5.0);
        assert!((ball.area() - PI * 25.0).abs() < 1e-9);
        assert_eq!(ball.bounds().top_left(), Point::new(5.0, 5.0));
        assert!(ball.contains(Point::new(12.0, 10.0)));
        assert!(!ball.contains(Point::new(15.0, 10.0)));
        assert!(ball.intersects_circle(&Circle::new(Point::new(18.0, 10.0), 4.0)));
        assert!(!ball.intersects_circle(&Circle::new(Point::new(30.0, 10.0), 4.0)));

        let poly = ball.to_polygon(100);
        assert_eq!(poly.vertex_count(), 100);
        assert!(poly.vertices().iter().all(|v| (v.distance(ball.center()) - 5.0).abs() < 1e-9));
    }

    #[test]
    fn test_first_intersecting_edge() {
        let block = Rectangle::new(0.0, 0.0, 40.0, 20.0).to_polygon();
        let ball = Circle::new(Point::new(20.0, 25.0), 10.0);
        assert_eq!(
            ball.first_intersecting_edge(&block),
            Some(Line::from_coords(40.0, 20.0, 0.0, 20.0))
        );
        let far = Circle::new(Point::new(100.0, 100.0), 10.0);
        assert_eq!(far.first_intersecting_edge(&block), None);
    }

    proptest! {
        #[test]
        fn prop_far_from_face_and_outside_slab_misses(
            cx in -100.0..100.0f64,
            cy in -100.0..100.0f64,
            radius in 1.0..20.0f64,
            x1 in -100.0..100.0f64,
            y1 in -100.0..100.0f64,
            x2 in -100.0..100.0f64,
            y2 in -100.0..100.0f64,
        ) {
            let ball = Circle::new(Point::new(cx, cy), radius);
            let line = Line::from_coords(x1, y1, x2, y2);
            prop_assume!(line.length() > 1.0);
            prop_assume!(line.distance(ball.center()) > radius);
            prop_assume!(!line.projects_inside(ball.center()));
            prop_assert_eq!(ball.intersection_type(&line), IntersectionType::NoIntersection);
        }
    }
}
