//! Closed polygons and axis-aligned rectangles

use serde::{Deserialize, Serialize};

use super::line::Line;
use super::point::Point;
use crate::error::{PhysicsError, PhysicsResult};

/// A closed polygon; edges are the cyclic consecutive vertex pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonData")]
pub struct Polygon {
    vertices: Vec<Point>,
}

/// Unchecked wire form of [`Polygon`]
#[derive(Deserialize)]
struct PolygonData {
    vertices: Vec<Point>,
}

impl TryFrom<PolygonData> for Polygon {
    type Error = PhysicsError;

    fn try_from(data: PolygonData) -> PhysicsResult<Self> {
        Polygon::new(data.vertices)
    }
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> PhysicsResult<Self> {
        if vertices.len() < 2 {
            return Err(PhysicsError::DegeneratePolygon(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Callers guarantee at least two vertices
    pub(super) fn from_vertices(vertices: Vec<Point>) -> Self {
        debug_assert!(vertices.len() >= 2);
        Self { vertices }
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Edges in vertex order. A two-vertex polygon has a single edge.
    pub fn edges(&self) -> Vec<Line> {
        let n = self.vertices.len();
        if n == 2 {
            return vec![Line::new(self.vertices[0], self.vertices[1])];
        }
        (0..n)
            .map(|i| Line::new(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// Shoelace area
    pub fn area(&self) -> f64 {
        self.edges()
            .iter()
            .map(|edge| edge.start().cross(edge.end()))
            .sum::<f64>()
            .abs()
            / 2.0
    }

    pub fn bounds(&self) -> Rectangle {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return Rectangle::new(0.0, 0.0, 0.0, 0.0);
        };
        let (min, max) = rest.iter().fold((first, first), |(min, max), v| {
            (
                Point::new(min.x().min(v.x()), min.y().min(v.y())),
                Point::new(max.x().max(v.x()), max.y().max(v.y())),
            )
        });
        Rectangle::from_corners(min, max)
    }

    /// Vertex centroid
    pub fn center(&self) -> Point {
        let sum = self
            .vertices
            .iter()
            .fold(Point::ZERO, |acc, v| acc + *v);
        sum * (1.0 / self.vertices.len() as f64)
    }

    /// Even-odd ray cast; points exactly on an edge are unspecified
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        for edge in self.edges() {
            let (a, b) = (edge.start(), edge.end());
            if (a.y() > point.y()) != (b.y() > point.y()) {
                let x_cross = a.x() + (point.y() - a.y()) / (b.y() - a.y()) * (b.x() - a.x());
                if point.x() < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    pub fn intersects_line(&self, line: &Line) -> bool {
        self.edges().iter().any(|edge| edge.is_intersecting(line))
    }

    /// Every single-point intersection of `line` with an edge
    pub fn intersection_points(&self, line: &Line) -> Vec<Point> {
        self.edges()
            .iter()
            .filter_map(|edge| edge.intersection_with(line))
            .collect()
    }

    /// First edge of `other` that crosses one of ours
    pub fn intersecting_edge(&self, other: &Polygon) -> Option<Line> {
        let ours = self.edges();
        other
            .edges()
            .into_iter()
            .find(|theirs| ours.iter().any(|edge| edge.is_intersecting(theirs)))
    }
}

/// Axis-aligned rectangle stored as its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    top_left: Point,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Rectangle spanning two opposite corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            top_left: Point::new(a.x().min(b.x()), a.y().min(b.y())),
            width: (b.x() - a.x()).abs(),
            height: (b.y() - a.y()).abs(),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.top_left + Point::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.top_left + Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corners in winding order starting at the top-left
    pub fn vertices(&self) -> [Point; 4] {
        let (x1, y1) = (self.top_left.x(), self.top_left.y());
        let (x2, y2) = (x1 + self.width, y1 + self.height);
        [
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ]
    }

    pub fn edges(&self) -> [Line; 4] {
        let [a, b, c, d] = self.vertices();
        [Line::new(a, b), Line::new(b, c), Line::new(c, d), Line::new(d, a)]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_vertices(self.vertices().to_vec())
    }

    /// Strict containment; the border is outside
    pub fn contains(&self, point: Point) -> bool {
        let br = self.bottom_right();
        point.x() > self.top_left.x()
            && point.x() < br.x()
            && point.y() > self.top_left.y()
            && point.y() < br.y()
    }

    pub fn intersects_line(&self, line: &Line) -> bool {
        self.edges().iter().any(|edge| edge.is_intersecting(line))
    }

    pub fn intersection_points(&self, line: &Line) -> Vec<Point> {
        self.edges()
            .iter()
            .filter_map(|edge| edge.intersection_with(line))
            .collect()
    }
}

impl From<Rectangle> for Polygon {
    fn from(rect: Rectangle) -> Self {
        rect.to_polygon()
    }
}
