//! Brick Physics demo
//!
//! Runs a headless arena: seeded balls bounce off walls, a merged ledge,
//! a round bumper and a row of breakable bricks. Pass a settings JSON path
//! as the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::collections::HashSet;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use brick_physics::consts::*;
    use brick_physics::{
        Changes, Circle, Environment, HitEvent, Line, Point, PhysicsSettings, Rectangle,
    };

    env_logger::init();
    log::info!("Brick Physics (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => PhysicsSettings::load(path),
        None => PhysicsSettings::default(),
    };
    let dt = settings.dt();

    let seed = std::env::var("BRICK_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let mut rng = Pcg32::seed_from_u64(seed);
    log::info!("Seed: {}", seed);

    let mut env: Environment = Environment::with_settings(&settings);

    // Arena walls
    let (w, h) = (ARENA_WIDTH, ARENA_HEIGHT);
    for wall in [
        Line::from_coords(0.0, 0.0, w, 0.0),
        Line::from_coords(w, 0.0, w, h),
        Line::from_coords(w, h, 0.0, h),
        Line::from_coords(0.0, h, 0.0, 0.0),
    ] {
        env.add_collidable(wall);
    }

    // Solid ledge built from touching blocks, merged into one outline
    let ledge: Vec<Rectangle> = (0..6)
        .map(|i| Rectangle::new(200.0 + i as f64 * BLOCK_WIDTH, 420.0, BLOCK_WIDTH, BLOCK_HEIGHT))
        .collect();
    env.rebuild_boundary(&ledge);

    // Round bumper flattened to a polygon
    let bumper = Circle::new(Point::new(600.0, 300.0), 40.0).to_polygon(settings.polygon_accuracy);
    env.add_collidable(bumper);

    // Breakable bricks, spaced apart so each stays its own shape
    let mut bricks = HashSet::new();
    for i in 0..8 {
        let x = 60.0 + i as f64 * (BLOCK_WIDTH + 50.0);
        bricks.insert(env.add_collidable(Rectangle::new(x, 80.0, BLOCK_WIDTH, BLOCK_HEIGHT)));
    }
    log::info!("{} bricks placed", bricks.len());

    env.add_listener(move |event: &HitEvent, changes: &mut Changes| {
        if bricks.remove(&event.collidable) {
            log::info!("Brick {:?} broken at {:?}", event.collidable, event.point);
            changes.remove_collidable(event.collidable);
        }
    });

    for _ in 0..4 {
        let center = Point::new(
            rng.random_range(100.0..w - 100.0),
            rng.random_range(200.0..350.0),
        );
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let velocity = Point::from_angle_and_speed(angle, settings.ball_speed);
        env.add_moving(Circle::new(center, settings.ball_radius).with_velocity(velocity));
    }

    let ticks = settings.fps * 30;
    let mut hits = 0;
    for tick in 1..=ticks {
        hits += env.tick(dt).len();
        if tick % settings.fps == 0 {
            log::debug!(
                "t={}s hits={} collidables={}",
                tick / settings.fps,
                hits,
                env.collidable_count()
            );
        }
    }

    let remaining = env.collidable_count();
    for (id, ball) in env.colliders() {
        log::info!(
            "Ball {:?}: center {:?} velocity {:?}",
            id,
            ball.shape().center(),
            ball.shape().velocity()
        );
    }
    log::info!(
        "Done: {} ticks, {} hits, {} collidables left",
        ticks,
        hits,
        remaining
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm
}
