//! Per-object collision accumulator
//!
//! A collider owns its moving shape. During a tick it only records contacts
//! and folds velocity corrections into a pending velocity; `apply` is the
//! single place the shape's velocity changes, exactly once per tick.

use crate::consts::ELASTICITY;
use crate::geometry::{IntersectionType, Line, Velocity};

use super::collision::{Collidable, Moving, Shape};

#[derive(Debug, Clone)]
pub struct Collider<T> {
    shape: T,
    elasticity: f64,
    /// Live velocity plus every correction folded in this tick
    pending: Velocity,
    /// Segment contacts waiting for `apply`
    contacts: Vec<(Line, IntersectionType)>,
    /// A contact this tick came from the swept path crossing a wall
    swept: bool,
}

impl<T: Moving> Collider<T> {
    pub fn new(shape: T) -> Self {
        Self::with_elasticity(shape, ELASTICITY)
    }

    pub fn with_elasticity(shape: T, elasticity: f64) -> Self {
        let pending = shape.velocity();
        Self {
            shape,
            elasticity,
            pending,
            contacts: Vec::new(),
            swept: false,
        }
    }

    pub fn shape(&self) -> &T {
        &self.shape
    }

    pub fn into_shape(self) -> T {
        self.shape
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Velocity the shape will have after the next `apply`
    pub fn pending_velocity(&self) -> Velocity {
        self.pending
    }

    /// Contacts recorded since the last `apply`
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Replace the shape's velocity from outside the tick (serve, power-ups)
    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.shape.set_velocity(velocity);
        self.update_speed();
    }

    /// Move the shape one tick and re-sync the accumulator baseline
    pub fn move_one_step(&mut self, dt: f64) {
        self.shape.move_one_step(dt);
        self.update_speed();
    }

    /// Record contact with a static shape.
    ///
    /// Segments are queued for `apply`. Polygons resolve immediately against
    /// the live velocity and only their correction is folded in.
    pub fn collide(&mut self, shape: &Shape) {
        match shape {
            Shape::Line(line) => self.collide_line(line),
            Shape::Rectangle(_) | Shape::Polygon(_) => {
                if shape.edges().iter().any(|edge| {
                    self.shape.intersection_type(edge) == IntersectionType::MovementIntersection
                }) {
                    self.swept = true;
                }
                let velocity = self.shape.velocity();
                let point = self.shape.contact_point();
                let delta = shape.hit_with(point, velocity, self.elasticity) - velocity;
                log::debug!("polygon contact at {:?}: delta {:?}", point, delta);
                self.pending += delta;
            }
        }
    }

    /// Record contact with a single segment
    pub fn collide_line(&mut self, line: &Line) {
        let kind = self.shape.intersection_type(line);
        if kind == IntersectionType::NoIntersection {
            return;
        }
        log::debug!("contact {:?} with {:?}", kind, line);
        self.contacts.push((*line, kind));
    }

    /// Resolve the batch and commit it to the shape.
    ///
    /// Face contacts (`OnTop`, `MovementIntersection`) take precedence: when
    /// any is present, vertex contacts in the same batch are dropped, so a
    /// ball grazing the corner shared by two walls bounces once.
    pub fn apply(&mut self) {
        let has_face = self.contacts.iter().any(|(_, kind)| kind.is_face());
        let velocity = self.shape.velocity();
        let point = self.shape.contact_point();

        for (line, kind) in self.contacts.drain(..) {
            if has_face && kind == IntersectionType::OnVertex {
                log::debug!("dropping vertex contact with {:?}", line);
                continue;
            }
            self.swept |= kind == IntersectionType::MovementIntersection;
            self.pending += line.hit_with(point, velocity, self.elasticity) - velocity;
        }

        self.shape.set_velocity(self.pending);
        self.shape.finish_tick(self.swept);
        self.swept = false;
        self.update_speed();
    }

    /// Re-sync the accumulator baseline with the shape's live velocity
    pub fn update_speed(&mut self) {
        self.pending = self.shape.velocity();
    }
}
