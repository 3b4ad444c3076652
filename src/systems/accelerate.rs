//! Input-driven acceleration.
//!
//! Every entity carrying `ACC | INPUT` gets its acceleration from the tick's
//! input sample, minus a damping term proportional to its current velocity.
//! Entities without a velocity component are damped as if standing still.

use crate::components::signature::Signature;
use crate::entity::Entity;
use crate::systems::System;
use crate::world::World;

/// Acceleration per unit of input, in sub-pixels per tick squared.
pub const ACCEL_GAIN: f32 = 5.0;
/// Fraction of velocity fed back as deceleration.
pub const VELOCITY_DAMPING: f32 = 0.005;

fn axis(input: f32, vel: i32) -> i32 {
    (ACCEL_GAIN * input - (vel as f32 * VELOCITY_DAMPING).trunc()) as i32
}

pub struct Accelerate;

impl System for Accelerate {
    fn name(&self) -> &'static str {
        "accelerate"
    }

    fn signature(&self) -> Signature {
        Signature::ACC | Signature::INPUT
    }

    fn run(&mut self, world: &mut World, entities: &[Entity]) {
        let input = world.input;
        let store = world.entities.components_mut();
        for entity in entities {
            let i = entity.index();
            let vel = store.vel[i];
            store.acc[i].x = axis(input.dx, vel.x);
            store.acc[i].y = axis(input.dy, vel.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InputSample;
    use crate::components::vec2::IVec2;
    use crate::entity::EntityInfo;

    fn player(world: &mut World) -> Entity {
        world
            .entities
            .spawn(EntityInfo {
                signature: Signature::ACC | Signature::VEL | Signature::INPUT,
                ..Default::default()
            })
            .unwrap()
    }

    fn step(world: &mut World) {
        let ids = world.entities.query(Accelerate.signature());
        Accelerate.run(world, &ids);
    }

    #[test]
    fn input_scales_by_gain() {
        let mut world = World::headless();
        let e = player(&mut world);
        world.input = InputSample::from_axes(1, 0);
        step(&mut world);
        assert_eq!(world.entities.acceleration(e), Some(IVec2::new(5, 0)));

        world.input = InputSample::from_axes(0, -1);
        step(&mut world);
        assert_eq!(world.entities.acceleration(e), Some(IVec2::new(0, -5)));
    }

    #[test]
    fn velocity_damps_acceleration() {
        let mut world = World::headless();
        let e = player(&mut world);
        world.entities.set_velocity(e, IVec2::new(300, -1000));
        world.input = InputSample::from_axes(1, 0);
        step(&mut world);
        // 5 - trunc(1.5) and 0 - trunc(-5.0)
        assert_eq!(world.entities.acceleration(e), Some(IVec2::new(4, 5)));
    }

    #[test]
    fn diagonal_input_truncates() {
        let mut world = World::headless();
        let e = player(&mut world);
        world.input = InputSample::from_axes(1, 1);
        step(&mut world);
        assert_eq!(world.entities.acceleration(e), Some(IVec2::new(3, 3)));
    }

    #[test]
    fn entities_without_input_are_untouched() {
        let mut world = World::headless();
        let npc = world
            .entities
            .spawn(EntityInfo {
                signature: Signature::ACC | Signature::VEL,
                ..Default::default()
            })
            .unwrap();
        world.input = InputSample::from_axes(1, 1);
        step(&mut world);
        assert_eq!(world.entities.acceleration(npc), Some(IVec2::ZERO));
    }
}
