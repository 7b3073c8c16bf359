//! Brick Physics - collision core for a Breakout-style arcade game
//!
//! Core modules:
//! - `geometry`: Points, segments, polygons and the moving ball shape
//! - `sim`: Collision capabilities, per-ball colliders, the broad-phase environment
//!   and static-boundary line merging
//! - `settings`: Data-driven physics tuning
//! - `error`: Error types for fallible geometry and configuration calls

pub mod error;
pub mod geometry;
pub mod settings;
pub mod sim;

pub use error::{PhysicsError, PhysicsResult};
pub use geometry::{Circle, IntersectionType, Line, Point, Polygon, Rectangle, Velocity};
pub use settings::PhysicsSettings;
pub use sim::{
    Changes, Collidable, CollidableId, Collider, CollisionInfo, Environment, HitEvent, HitListener,
    Moving, MovingId, Shape,
};

/// Physics configuration constants
pub mod consts {
    /// Absolute tolerance for coordinate and cross-product comparisons
    pub const TOLERANCE: f64 = 1e-5;
    /// Kinetic energy kept on a bounce (1.0 = lossless)
    pub const ELASTICITY: f64 = 1.0;
    /// Simulation rate (ticks per second)
    pub const FPS: u32 = 120;
    /// Sample points used when a circle is flattened into a polygon
    pub const POLYGON_ACCURACY: usize = 100;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_SPEED: f64 = 200.0;

    /// Demo arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;
    pub const BLOCK_WIDTH: f64 = 40.0;
    pub const BLOCK_HEIGHT: f64 = 20.0;
}

/// Compare two doubles within [`consts::TOLERANCE`]
#[inline]
pub fn doubles_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= consts::TOLERANCE
}

/// Sign of a number as -1, 0 or 1 (exact zero maps to 0)
#[inline]
pub fn sign(a: f64) -> i8 {
    if a == 0.0 {
        0
    } else if a > 0.0 {
        1
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubles_equal_tolerance() {
        assert!(doubles_equal(1.0, 1.0 + 0.5e-5));
        assert!(doubles_equal(-3.0, -3.0 - 1e-6));
        assert!(!doubles_equal(1.0, 1.0001));
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(-0.0), 0);
        assert_eq!(sign(2.5), 1);
        assert_eq!(sign(-1e-12), -1);
    }
}
