//! Collision simulation module
//!
//! All resolution logic lives here. A tick must stay deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by id)
//! - Contacts are collected first and committed once per moving shape
//! - No rendering or platform dependencies

pub mod collider;
pub mod collision;
pub mod environment;
pub mod merge;

pub use collider::Collider;
pub use collision::{Collidable, CollisionInfo, HitEvent, Moving, Shape};
pub use environment::{Changes, CollidableId, Environment, HitListener, MovingId};
pub use merge::{boundary_lines, cancel_shared_edges, merge_lines};
