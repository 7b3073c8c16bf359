//! Error types for the physics core.
//!
//! Geometric degeneracies are handled in-band; only precondition violations
//! and bad configuration surface as `PhysicsError`.

use thiserror::Error;

use crate::geometry::{Line, Point};

/// Unified error type for the physics core.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// `Line::merge` was called on segments that do not share exactly one
    /// endpoint with collinear directions.
    #[error("Lines are not mergeable: {first:?} and {second:?}")]
    NotMergeable { first: Line, second: Line },

    /// The point is neither end of the segment.
    #[error("Point {0:?} is not an endpoint of the line")]
    NotAnEndpoint(Point),

    /// A coordinate was NaN or infinite.
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    /// A polygon needs at least two vertices to have an edge.
    #[error("Polygon needs at least 2 vertices, got {0}")]
    DegeneratePolygon(usize),

    /// Settings value is out of its valid range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, PhysicsError>`.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
