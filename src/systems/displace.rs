//! Velocity and position integration.
//!
//! `vel = trunc((vel + acc) * FRICTION)`, then `pos += vel`. All values are
//! integer sub-pixels, so a body coasting without acceleration comes to a
//! full stop after a few dozen ticks.

use log::trace;

use crate::components::signature::Signature;
use crate::entity::Entity;
use crate::systems::System;
use crate::world::World;

/// Fraction of velocity kept each tick.
pub const FRICTION: f32 = 0.9;

pub struct Displace;

impl System for Displace {
    fn name(&self) -> &'static str {
        "displace"
    }

    fn signature(&self) -> Signature {
        Signature::ACC | Signature::VEL | Signature::POS | Signature::DIM
    }

    fn run(&mut self, world: &mut World, entities: &[Entity]) {
        let store = world.entities.components_mut();
        for entity in entities {
            let i = entity.index();
            let sum = store.vel[i] + store.acc[i];
            let vel = &mut store.vel[i];
            vel.x = (sum.x as f32 * FRICTION) as i32;
            vel.y = (sum.y as f32 * FRICTION) as i32;
            let vel = *vel;
            store.pos[i] += vel;
            if !vel.is_zero() {
                trace!("{entity} moved to {:?}", store.pos[i]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::vec2::IVec2;
    use crate::entity::EntityInfo;

    fn body(world: &mut World, signature: Signature) -> Entity {
        world
            .entities
            .spawn(EntityInfo {
                signature,
                x: 1000,
                y: 1000,
                w: 3800,
                h: 3800,
                ..Default::default()
            })
            .unwrap()
    }

    fn step(world: &mut World) {
        let ids = world.entities.query(Displace.signature());
        Displace.run(world, &ids);
    }

    #[test]
    fn acceleration_feeds_velocity_then_position() {
        let mut world = World::headless();
        let e = body(&mut world, Displace.signature());
        world.entities.components_mut().acc[e.index()] = IVec2::new(5, -5);
        step(&mut world);
        // trunc(5 * 0.9) = 4, trunc(-5 * 0.9) = -4
        assert_eq!(world.entities.velocity(e), Some(IVec2::new(4, -4)));
        assert_eq!(world.entities.position(e), Some(IVec2::new(1004, 996)));
        step(&mut world);
        // trunc(9 * 0.9) = 8
        assert_eq!(world.entities.velocity(e), Some(IVec2::new(8, -8)));
        assert_eq!(world.entities.position(e), Some(IVec2::new(1012, 988)));
    }

    #[test]
    fn coasting_body_stops() {
        let mut world = World::headless();
        let e = body(&mut world, Displace.signature());
        world.entities.set_velocity(e, IVec2::new(100, 0));
        for _ in 0..100 {
            step(&mut world);
        }
        assert_eq!(world.entities.velocity(e), Some(IVec2::ZERO));
        let pos = world.entities.position(e).unwrap();
        assert!(pos.x > 1000 && pos.x < 2000);
    }

    #[test]
    fn body_without_dimensions_does_not_move() {
        let mut world = World::headless();
        let e = body(&mut world, Signature::ACC | Signature::VEL | Signature::POS);
        world.entities.set_velocity(e, IVec2::new(50, 50));
        step(&mut world);
        assert_eq!(world.entities.position(e), Some(IVec2::new(1000, 1000)));
    }
}
