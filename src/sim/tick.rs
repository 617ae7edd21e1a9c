//! Fixed-step simulation tick
//!
//! Input actions become velocity changes; the player then moves, collides,
//! and slows down. One tick per rendered frame.

use serde::{Deserialize, Serialize};

use super::collision::{AxisCollision, move_and_slide};
use super::state::World;
use crate::consts::*;

/// A discrete input intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    TurnLeft,
    TurnRight,
    ThrustForward,
    ThrustBackward,
    StrafeLeft,
    StrafeRight,
    FovIncrease,
    FovDecrease,
    TogglePerspectiveCorrection,
    ToggleMetrics,
}

impl Action {
    /// Classic key bindings
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'a' => Some(Action::TurnLeft),
            'd' => Some(Action::TurnRight),
            'w' => Some(Action::ThrustForward),
            's' => Some(Action::ThrustBackward),
            'q' => Some(Action::StrafeLeft),
            'e' => Some(Action::StrafeRight),
            'h' => Some(Action::FovIncrease),
            'n' => Some(Action::FovDecrease),
            'p' => Some(Action::TogglePerspectiveCorrection),
            'm' => Some(Action::ToggleMetrics),
            _ => None,
        }
    }
}

/// Input for a single tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn single(action: Action) -> Self {
        Self {
            actions: vec![action],
        }
    }
}

/// Apply one intent to the world. Movement intents only change velocities.
pub fn apply_action(world: &mut World, action: Action) {
    let player = &mut world.player;
    match action {
        Action::TurnLeft => player.turn(-TURN_RATE),
        Action::TurnRight => player.turn(TURN_RATE),
        Action::ThrustForward => player.thrust(0.0, THRUST),
        Action::ThrustBackward => player.thrust(180.0, THRUST),
        Action::StrafeLeft => player.thrust(-90.0, THRUST),
        Action::StrafeRight => player.thrust(90.0, THRUST),
        Action::FovIncrease => world.view.adjust_fov(1.0),
        Action::FovDecrease => world.view.adjust_fov(-1.0),
        Action::TogglePerspectiveCorrection => {
            world.view.perspective_correction = !world.view.perspective_correction;
            log::info!("Perspective correction: {}", world.view.perspective_correction);
        }
        Action::ToggleMetrics => {
            world.view.metrics = !world.view.metrics;
            log::info!("Metrics: {}", world.view.metrics);
        }
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> AxisCollision {
    for &action in &input.actions {
        apply_action(world, action);
    }

    let player = &mut world.player;
    let hit = move_and_slide(&world.grid, &mut player.pos, &mut player.vel);
    if hit.any() {
        log::trace!("Collision at {:?}: {:?}", player.pos, hit);
    }

    player.integrate_turn();
    world.time_ticks += 1;
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Grid, Player};
    use crate::settings::ViewSettings;
    use proptest::prelude::*;

    fn world_at(x: f64, y: f64, angle: f64) -> World {
        World::new(Grid::default(), Player::new(x, y, angle), ViewSettings::default())
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key('w'), Some(Action::ThrustForward));
        assert_eq!(Action::from_key('D'), Some(Action::TurnRight));
        assert_eq!(Action::from_key('x'), None);
    }

    #[test]
    fn test_thrust_changes_velocity_not_position() {
        let mut world = world_at(3.0, 3.0, 0.0);
        apply_action(&mut world, Action::ThrustForward);
        assert_eq!(world.player.pos.x, 3.0);
        assert!((world.player.vel.x - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_turn_goes_through_angular_velocity() {
        let mut world = world_at(3.0, 3.0, 10.0);
        tick(&mut world, &TickInput::single(Action::TurnLeft));
        assert!((world.player.angle() - 9.0).abs() < 1e-9);
        assert!((world.player.angular_vel + 0.9).abs() < 1e-12);

        // Keeps coasting with no input
        tick(&mut world, &TickInput::default());
        assert!((world.player.angle() - 8.1).abs() < 1e-9);
    }

    #[test]
    fn test_angle_wraps_below_zero() {
        let mut world = world_at(3.0, 3.0, 0.5);
        tick(&mut world, &TickInput::single(Action::TurnLeft));
        assert!((world.player.angle() - 359.5).abs() < 1e-9);
    }

    #[test]
    fn test_view_actions() {
        let mut world = world_at(3.0, 3.0, 0.0);
        tick(&mut world, &TickInput::single(Action::FovIncrease));
        assert_eq!(world.view.fov, 91.0);
        tick(&mut world, &TickInput::single(Action::TogglePerspectiveCorrection));
        assert!(!world.view.perspective_correction);
        tick(&mut world, &TickInput::single(Action::ToggleMetrics));
        assert!(!world.view.metrics);
        assert_eq!(world.time_ticks, 3);
    }

    #[test]
    fn test_thrust_into_wall_stops_on_that_axis() {
        // Room on the left of the default map: columns 1..=4 open, wall at column 5
        let mut world = world_at(4.995, 3.5, 0.0);
        let hit = tick(&mut world, &TickInput::single(Action::ThrustForward));
        assert!(hit.x);
        assert_eq!(world.player.vel.x, 0.0);
        assert!(world.player.pos.x < 5.0);
    }

    #[test]
    fn test_walking_never_enters_walls() {
        let mut world = world_at(3.0, 3.0, 0.0);
        for _ in 0..500 {
            tick(&mut world, &TickInput::single(Action::ThrustForward));
            let p = world.player.pos;
            let tile = world.grid.tile_at(p.y.floor() as usize, p.x.floor() as usize);
            assert!(!tile.is_solid(), "walked into {tile:?} at {p:?}");
        }
        assert!(world.player.pos.x < 5.0);
    }

    #[test]
    fn test_deterministic() {
        let inputs = [
            TickInput::single(Action::ThrustForward),
            TickInput::single(Action::TurnRight),
            TickInput::single(Action::StrafeLeft),
            TickInput::default(),
        ];
        let mut a = World::default();
        let mut b = World::default();
        for input in inputs.iter().cycle().take(200) {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn velocity_decays_geometrically(
            vx in -0.05f64..0.05,
            vy in -0.05f64..0.05,
            ticks in 1usize..40,
        ) {
            // Middle of the big open room, far enough from walls for small speeds
            let mut world = world_at(9.5, 3.5, 0.0);
            world.player.vel = glam::DVec2::new(vx, vy);
            let mut speed = world.player.speed();
            for _ in 0..ticks {
                let hit = tick(&mut world, &TickInput::default());
                prop_assert!(!hit.any());
                let next = world.player.speed();
                prop_assert!((next - speed * DAMPING).abs() < 1e-12);
                if speed > 0.0 {
                    prop_assert!(next < speed);
                }
                speed = next;
            }
        }
    }
}
