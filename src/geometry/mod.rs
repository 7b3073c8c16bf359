//! Geometry primitives
//!
//! Value types only: nothing here knows about velocities being resolved or
//! which shapes take part in a tick.

pub mod circle;
pub mod line;
pub mod point;
pub mod polygon;

pub use circle::{Circle, IntersectionType};
pub use line::{Line, is_clockwise, is_clockwise_or_collinear};
pub use point::{Point, Velocity};
pub use polygon::{Polygon, Rectangle};
