//! Broad-phase collision environment
//!
//! Holds the static collidables and the moving shapes (each wrapped in its
//! collider) and resolves one tick at a time:
//! - Snapshot both sets before scanning
//! - Test every moving shape against every static shape, feeding its collider
//! - `apply` each collider exactly once
//! - Apply additions/removals requested by hit listeners after the scan
//!
//! Iteration follows id order so a tick is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::ELASTICITY;
use crate::geometry::{Circle, Line, Rectangle};
use crate::settings::PhysicsSettings;

use super::collider::Collider;
use super::collision::{Collidable, CollisionInfo, HitEvent, Moving, Shape};
use super::merge::boundary_lines;

/// Id of a static collidable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollidableId(pub u32);

/// Id of a moving shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovingId(pub u32);

/// Set mutations requested while a tick is being scanned
#[derive(Debug, Default)]
pub struct Changes {
    add_collidables: Vec<Shape>,
    remove_collidables: Vec<CollidableId>,
    remove_moving: Vec<MovingId>,
}

impl Changes {
    pub fn add_collidable(&mut self, shape: impl Into<Shape>) {
        self.add_collidables.push(shape.into());
    }

    pub fn remove_collidable(&mut self, id: CollidableId) {
        self.remove_collidables.push(id);
    }

    pub fn remove_moving(&mut self, id: MovingId) {
        self.remove_moving.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.add_collidables.is_empty()
            && self.remove_collidables.is_empty()
            && self.remove_moving.is_empty()
    }
}

/// Reacts to contacts as they are found (blocks breaking, balls lost)
pub trait HitListener {
    fn hit_event(&mut self, event: &HitEvent, changes: &mut Changes);
}

impl<F> HitListener for F
where
    F: FnMut(&HitEvent, &mut Changes),
{
    fn hit_event(&mut self, event: &HitEvent, changes: &mut Changes) {
        self(event, changes)
    }
}

pub struct Environment<T = Circle> {
    collidables: BTreeMap<CollidableId, Shape>,
    moving: BTreeMap<MovingId, Collider<T>>,
    /// Lines produced by the last `rebuild_boundary`
    boundary: Vec<CollidableId>,
    listeners: Vec<Box<dyn HitListener>>,
    elasticity: f64,
    next_id: u32,
}

impl<T: Moving> Default for Environment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Moving> Environment<T> {
    pub fn new() -> Self {
        Self {
            collidables: BTreeMap::new(),
            moving: BTreeMap::new(),
            boundary: Vec::new(),
            listeners: Vec::new(),
            elasticity: ELASTICITY,
            next_id: 1,
        }
    }

    pub fn with_settings(settings: &PhysicsSettings) -> Self {
        Self {
            elasticity: settings.elasticity,
            ..Self::new()
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_collidable(&mut self, shape: impl Into<Shape>) -> CollidableId {
        let id = CollidableId(self.next_id());
        self.collidables.insert(id, shape.into());
        id
    }

    pub fn remove_collidable(&mut self, id: CollidableId) -> Option<Shape> {
        let removed = self.collidables.remove(&id);
        if removed.is_none() {
            log::warn!("remove_collidable: unknown id {:?}", id);
        }
        self.boundary.retain(|b| *b != id);
        removed
    }

    pub fn collidable(&self, id: CollidableId) -> Option<&Shape> {
        self.collidables.get(&id)
    }

    pub fn collidables(&self) -> impl Iterator<Item = (CollidableId, &Shape)> {
        self.collidables.iter().map(|(id, shape)| (*id, shape))
    }

    pub fn collidable_count(&self) -> usize {
        self.collidables.len()
    }

    /// Wrap `shape` in a collider using this environment's elasticity
    pub fn add_moving(&mut self, shape: T) -> MovingId {
        let id = MovingId(self.next_id());
        self.moving
            .insert(id, Collider::with_elasticity(shape, self.elasticity));
        id
    }

    pub fn remove_moving(&mut self, id: MovingId) -> Option<T> {
        let removed = self.moving.remove(&id).map(Collider::into_shape);
        if removed.is_none() {
            log::warn!("remove_moving: unknown id {:?}", id);
        }
        removed
    }

    pub fn moving(&self, id: MovingId) -> Option<&Collider<T>> {
        self.moving.get(&id)
    }

    pub fn moving_mut(&mut self, id: MovingId) -> Option<&mut Collider<T>> {
        self.moving.get_mut(&id)
    }

    pub fn colliders(&self) -> impl Iterator<Item = (MovingId, &Collider<T>)> {
        self.moving.iter().map(|(id, collider)| (*id, collider))
    }

    pub fn moving_count(&self) -> usize {
        self.moving.len()
    }

    pub fn add_listener(&mut self, listener: impl HitListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear_collidables(&mut self) {
        self.collidables.clear();
        self.boundary.clear();
    }

    pub fn clear_moving(&mut self) {
        self.moving.clear();
    }

    pub fn clear(&mut self) {
        self.clear_collidables();
        self.clear_moving();
    }

    /// Replace the lines derived from the previous block layout with the
    /// merged exterior boundary of `blocks`
    pub fn rebuild_boundary(&mut self, blocks: &[Rectangle]) -> Vec<CollidableId> {
        for id in std::mem::take(&mut self.boundary) {
            self.collidables.remove(&id);
        }
        let lines = boundary_lines(blocks);
        log::info!(
            "Rebuilt boundary: {} blocks -> {} lines",
            blocks.len(),
            lines.len()
        );
        let ids: Vec<CollidableId> = lines
            .into_iter()
            .map(|line| self.add_collidable(line))
            .collect();
        self.boundary = ids.clone();
        ids
    }

    /// Move every moving shape one step, then resolve
    pub fn tick(&mut self, dt: f64) -> Vec<HitEvent> {
        for collider in self.moving.values_mut() {
            collider.move_one_step(dt);
        }
        self.update()
    }

    /// One resolution pass over snapshots of both sets
    pub fn update(&mut self) -> Vec<HitEvent> {
        let statics: Vec<(CollidableId, Shape)> = self
            .collidables
            .iter()
            .map(|(id, shape)| (*id, shape.clone()))
            .collect();
        let moving_ids: Vec<MovingId> = self.moving.keys().copied().collect();

        let mut events = Vec::new();
        let mut changes = Changes::default();

        for moving_id in moving_ids {
            let Some(collider) = self.moving.get_mut(&moving_id) else {
                continue;
            };
            for (collidable_id, shape) in &statics {
                if !collider.shape().is_intersecting(shape) {
                    continue;
                }
                let event = HitEvent {
                    moving: moving_id,
                    collidable: *collidable_id,
                    point: collider.shape().contact_point(),
                    velocity: collider.shape().velocity(),
                };
                collider.collide(shape);
                for listener in &mut self.listeners {
                    listener.hit_event(&event, &mut changes);
                }
                events.push(event);
            }
            collider.apply();
        }

        if !changes.is_empty() {
            self.apply_changes(changes);
        }
        events
    }

    fn apply_changes(&mut self, changes: Changes) {
        log::debug!(
            "Applying deferred changes: +{} -{} collidables, -{} moving",
            changes.add_collidables.len(),
            changes.remove_collidables.len(),
            changes.remove_moving.len()
        );
        for id in changes.remove_collidables {
            if self.collidables.contains_key(&id) {
                self.remove_collidable(id);
            }
        }
        for id in changes.remove_moving {
            self.moving.remove(&id);
        }
        for shape in changes.add_collidables {
            self.add_collidable(shape);
        }
    }

    /// Collidable hit by `trajectory` whose center is nearest its start
    pub fn closest_collision(&self, trajectory: &Line) -> Option<CollisionInfo> {
        let start = trajectory.start();
        self.collidables
            .iter()
            .filter(|(_, shape)| shape.intersects_line(trajectory))
            .min_by(|(_, a), (_, b)| {
                a.center()
                    .distance(start)
                    .total_cmp(&b.center().distance(start))
            })
            .map(|(id, shape)| CollisionInfo {
                collidable: *id,
                point: shape
                    .closest_intersection(trajectory)
                    .unwrap_or_else(|| shape.center()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{IntersectionType, Point};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ball(x: f64, y: f64, vx: f64, vy: f64) -> Circle {
        Circle::new(Point::new(x, y), 10.0).with_velocity(Point::new(vx, vy))
    }

    #[test]
    fn test_ball_reflects_off_crossed_line() {
        let mut env = Environment::new();
        env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        let id = env.add_moving(ball(100.0, 100.0, 0.0, 50.0));

        // One step long enough to carry the ball across the line
        let events = env.tick(2.0);
        assert_eq!(events.len(), 1);

        let ball = env.moving(id).unwrap().shape();
        assert_eq!(ball.velocity(), Point::new(0.0, -50.0));
        assert_eq!(ball.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_no_contact_no_events() {
        let mut env = Environment::new();
        env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        let id = env.add_moving(ball(100.0, 50.0, 10.0, 0.0));
        assert!(env.tick(1.0).is_empty());
        let ball = env.moving(id).unwrap().shape();
        assert_eq!(ball.center(), Point::new(110.0, 50.0));
        assert_eq!(ball.last_center(), Point::new(110.0, 50.0));
    }

    #[test]
    fn test_multiple_contacts_applied_once() {
        // Ball wedged into a corner hits both walls in the same tick
        let mut env = Environment::new();
        env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        env.add_collidable(Line::from_coords(200.0, 0.0, 200.0, 150.0));
        let id = env.add_moving(ball(192.0, 142.0, 30.0, 40.0));

        let events = env.update();
        assert_eq!(events.len(), 2);
        assert_eq!(
            env.moving(id).unwrap().shape().velocity(),
            Point::new(-30.0, -40.0)
        );
    }

    #[test]
    fn test_shared_corner_bounces_once() {
        // Two walls meeting at a corner; the ball touches the floor face and
        // the side wall's endpoint
        let mut env = Environment::new();
        env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        env.add_collidable(Line::from_coords(106.0, 136.0, 106.0, 100.0));
        let id = env.add_moving(ball(100.0, 142.0, 20.0, 50.0));

        let shape = env.moving(id).unwrap().shape();
        assert_eq!(
            shape.intersection_type(&Line::from_coords(106.0, 136.0, 106.0, 100.0)),
            IntersectionType::OnVertex
        );

        env.update();
        assert_eq!(
            env.moving(id).unwrap().shape().velocity(),
            Point::new(20.0, -50.0)
        );
    }

    #[test]
    fn test_listener_removal_deferred_to_next_tick() {
        let mut env = Environment::new();
        let block = env.add_collidable(Rectangle::new(80.0, 150.0, 40.0, 20.0));
        let a = env.add_moving(ball(100.0, 142.0, 0.0, 50.0));
        let b = env.add_moving(ball(105.0, 141.0, 0.0, 50.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        env.add_listener(move |event: &HitEvent, changes: &mut Changes| {
            log.borrow_mut().push(event.moving);
            changes.remove_collidable(event.collidable);
        });

        let events = env.update();
        // Both balls still saw the block during the scan
        assert_eq!(events.len(), 2);
        assert_eq!(*seen.borrow(), vec![a, b]);
        assert!(env.collidable(block).is_none());

        // And both bounced
        assert_eq!(env.moving(a).unwrap().shape().velocity(), Point::new(0.0, -50.0));
        assert_eq!(env.moving(b).unwrap().shape().velocity(), Point::new(0.0, -50.0));
    }

    #[test]
    fn test_listener_can_remove_moving() {
        let mut env = Environment::new();
        let floor = env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        let id = env.add_moving(ball(100.0, 142.0, 0.0, 50.0));
        env.add_listener(move |event: &HitEvent, changes: &mut Changes| {
            if event.collidable == floor {
                changes.remove_moving(event.moving);
            }
        });
        env.update();
        assert!(env.moving(id).is_none());
        assert_eq!(env.moving_count(), 0);
    }

    #[test]
    fn test_closest_collision() {
        let mut env: Environment = Environment::new();
        let near = env.add_collidable(Rectangle::new(50.0, -10.0, 20.0, 20.0));
        env.add_collidable(Rectangle::new(150.0, -10.0, 20.0, 20.0));
        env.add_collidable(Rectangle::new(50.0, 100.0, 20.0, 20.0));

        let trajectory = Line::from_coords(0.0, 0.0, 300.0, 0.0);
        let info = env.closest_collision(&trajectory).unwrap();
        assert_eq!(info.collidable, near);
        assert_eq!(info.point, Point::new(50.0, 0.0));

        let miss = Line::from_coords(0.0, 300.0, 300.0, 300.0);
        assert!(env.closest_collision(&miss).is_none());
    }

    #[test]
    fn test_rebuild_boundary_replaces_previous_lines() {
        let mut env: Environment = Environment::new();
        let wall = env.add_collidable(Line::from_coords(0.0, 0.0, 0.0, 600.0));

        let row = [
            Rectangle::new(0.0, 100.0, 40.0, 20.0),
            Rectangle::new(40.0, 100.0, 40.0, 20.0),
        ];
        let first = env.rebuild_boundary(&row);
        assert_eq!(first.len(), 4);
        assert_eq!(env.collidable_count(), 5);

        let second = env.rebuild_boundary(&row[..1]);
        assert_eq!(second.len(), 4);
        assert!(first.iter().all(|id| env.collidable(*id).is_none()));
        assert!(env.collidable(wall).is_some());
        assert_eq!(env.collidable_count(), 5);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut env = Environment::new();
        let line = env.add_collidable(Line::from_coords(0.0, 0.0, 1.0, 0.0));
        let id = env.add_moving(ball(0.0, 0.0, 0.0, 0.0));
        assert!(env.remove_collidable(line).is_some());
        assert!(env.remove_collidable(line).is_none());
        assert!(env.remove_moving(id).is_some());

        env.add_collidable(Line::from_coords(0.0, 0.0, 1.0, 0.0));
        let kept = env.add_moving(ball(0.0, 0.0, 0.0, 0.0));
        assert_eq!(env.colliders().map(|(id, _)| id).collect::<Vec<_>>(), vec![kept]);
        env.clear();
        assert_eq!(env.collidable_count(), 0);
        assert_eq!(env.moving_count(), 0);
    }

    #[test]
    fn test_settings_elasticity_applies() {
        let settings = PhysicsSettings {
            elasticity: 0.5,
            ..PhysicsSettings::default()
        };
        let mut env = Environment::with_settings(&settings);
        env.add_collidable(Line::from_coords(0.0, 150.0, 200.0, 150.0));
        let id = env.add_moving(ball(100.0, 142.0, 0.0, 50.0));
        env.update();
        assert_eq!(
            env.moving(id).unwrap().shape().velocity(),
            Point::new(0.0, -25.0)
        );
    }
}
