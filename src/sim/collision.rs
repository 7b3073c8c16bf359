//! Collision capabilities shared by every shape kind
//!
//! Static shapes answer `hit` (what happens to a velocity that strikes them);
//! moving shapes answer how they touch a segment and how they move.

use serde::{Deserialize, Serialize};

use crate::consts::{ELASTICITY, TOLERANCE};
use crate::geometry::{Circle, IntersectionType, Line, Point, Polygon, Rectangle, Velocity};

/// Something a moving shape can bounce off
pub trait Collidable {
    /// Velocity after striking this shape at `point` with `velocity`
    fn hit_with(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity;

    /// `hit_with` at the default elasticity
    fn hit(&self, point: Point, velocity: Velocity) -> Velocity {
        self.hit_with(point, velocity, ELASTICITY)
    }

    fn center(&self) -> Point;

    fn intersects_line(&self, line: &Line) -> bool;
}

impl Collidable for Line {
    fn hit_with(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity {
        self.reflect(point, velocity, elasticity)
    }

    fn center(&self) -> Point {
        self.middle()
    }

    fn intersects_line(&self, line: &Line) -> bool {
        self.is_intersecting(line)
    }
}

impl Collidable for Polygon {
    fn hit_with(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity {
        hit_nearest_edge(&self.edges(), point, velocity, elasticity)
    }

    fn center(&self) -> Point {
        Polygon::center(self)
    }

    fn intersects_line(&self, line: &Line) -> bool {
        Polygon::intersects_line(self, line)
    }
}

impl Collidable for Rectangle {
    fn hit_with(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity {
        hit_nearest_edge(&self.edges(), point, velocity, elasticity)
    }

    fn center(&self) -> Point {
        Rectangle::center(self)
    }

    fn intersects_line(&self, line: &Line) -> bool {
        Rectangle::intersects_line(self, line)
    }
}

/// Nearest feature of a polygon edge to a probe point
#[derive(Debug, Clone, Copy, PartialEq)]
struct Feature {
    distance: f64,
    /// Perpendicular foot inside the edge, rather than closest to an endpoint
    face: bool,
}

impl Feature {
    fn of(edge: &Line, point: Point) -> Self {
        if edge.projects_inside(point) {
            Feature {
                distance: edge.distance(point),
                face: true,
            }
        } else {
            Feature {
                distance: edge.start().distance(point).min(edge.end().distance(point)),
                face: false,
            }
        }
    }

    /// Nearer wins; within tolerance a face beats a vertex
    fn beats(&self, other: &Feature) -> bool {
        if (self.distance - other.distance).abs() <= TOLERANCE {
            self.face && !other.face
        } else {
            self.distance < other.distance
        }
    }
}

/// Delegate a polygon hit to the edge nearest `point`. Near-ties prefer a face
/// match over a vertex match, and exact ties keep the first edge in vertex
/// order.
fn hit_nearest_edge(
    edges: &[Line],
    point: Point,
    velocity: Velocity,
    elasticity: f64,
) -> Velocity {
    let mut best: Option<(Feature, &Line)> = None;
    for edge in edges {
        let feature = Feature::of(edge, point);
        if best.is_none_or(|(current, _)| feature.beats(&current)) {
            best = Some((feature, edge));
        }
    }
    match best {
        Some((_, edge)) => edge.reflect(point, velocity, elasticity),
        None => velocity,
    }
}

/// Tagged variant over every static shape kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl Shape {
    /// Collidable segments of the shape
    pub fn edges(&self) -> Vec<Line> {
        match self {
            Shape::Line(line) => vec![*line],
            Shape::Rectangle(rect) => rect.edges().to_vec(),
            Shape::Polygon(polygon) => polygon.edges(),
        }
    }

    /// Intersection with `trajectory` nearest its start, if any
    pub fn closest_intersection(&self, trajectory: &Line) -> Option<Point> {
        let start = trajectory.start();
        self.edges()
            .iter()
            .filter_map(|edge| edge.intersection_with(trajectory))
            .min_by(|a, b| a.distance(start).total_cmp(&b.distance(start)))
    }

    fn as_collidable(&self) -> &dyn Collidable {
        match self {
            Shape::Line(line) => line,
            Shape::Rectangle(rect) => rect,
            Shape::Polygon(polygon) => polygon,
        }
    }
}

impl Collidable for Shape {
    fn hit_with(&self, point: Point, velocity: Velocity, elasticity: f64) -> Velocity {
        self.as_collidable().hit_with(point, velocity, elasticity)
    }

    fn center(&self) -> Point {
        self.as_collidable().center()
    }

    fn intersects_line(&self, line: &Line) -> bool {
        self.as_collidable().intersects_line(line)
    }
}

impl From<Line> for Shape {
    fn from(line: Line) -> Self {
        Shape::Line(line)
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

/// A shape that moves every tick and is resolved by a [`Collider`](super::Collider)
pub trait Moving {
    fn velocity(&self) -> Velocity;

    fn set_velocity(&mut self, velocity: Velocity);

    fn move_one_step(&mut self, dt: f64);

    /// How this shape touches a segment
    fn intersection_type(&self, line: &Line) -> IntersectionType;

    /// Point handed to `Collidable::hit`; it must lie on the side of a wall
    /// the shape approached from
    fn contact_point(&self) -> Point;

    /// Close out the tick after resolution. `rewind` undoes the tick's motion
    /// first, for shapes that were caught crossing a wall.
    fn finish_tick(&mut self, rewind: bool);

    fn is_intersecting_line(&self, line: &Line) -> bool {
        self.intersection_type(line) != IntersectionType::NoIntersection
    }

    fn is_intersecting(&self, shape: &Shape) -> bool {
        shape.edges().iter().any(|edge| self.is_intersecting_line(edge))
    }
}

impl Moving for Circle {
    fn velocity(&self) -> Velocity {
        Circle::velocity(self)
    }

    fn set_velocity(&mut self, velocity: Velocity) {
        Circle::set_velocity(self, velocity);
    }

    fn move_one_step(&mut self, dt: f64) {
        Circle::move_one_step(self, dt);
    }

    fn intersection_type(&self, line: &Line) -> IntersectionType {
        Circle::intersection_type(self, line)
    }

    fn contact_point(&self) -> Point {
        self.last_center()
    }

    fn finish_tick(&mut self, rewind: bool) {
        if rewind {
            self.rewind();
        }
        self.update_last_center();
    }
}

/// One contact reported by [`Environment::update`](super::Environment::update)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub moving: super::MovingId,
    pub collidable: super::CollidableId,
    /// Point handed to the collidable's `hit`
    pub point: Point,
    /// Velocity of the moving shape before the tick's correction
    pub velocity: Velocity,
}

/// Result of a closest-collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub collidable: super::CollidableId,
    /// Where the trajectory meets the collidable, or its center when the
    /// trajectory only overlaps it collinearly
    pub point: Point,
}
