//! Walk-cycle animation driven by velocity.
//!
//! The sprite sheet of a walking character has one row per [`Direction`] and
//! one column per frame. Each tick the system picks the row from the dominant
//! velocity axis and, while the entity moves, advances the column once every
//! `ticks_per_frame` ticks. A standing entity shows frame 0 of its last row.
//!
//! The result is written into the sprite's `offset_x` (frame) and `offset_y`
//! (row) for the render pass.

use log::trace;

use crate::components::animation::Direction;
use crate::components::signature::Signature;
use crate::entity::Entity;
use crate::systems::System;
use crate::world::World;

pub struct AnimateByVelocity {
    pub ticks_per_frame: u32,
    pub max_frames: u32,
}

impl AnimateByVelocity {
    pub fn new(ticks_per_frame: u32, max_frames: u32) -> Self {
        Self {
            ticks_per_frame: ticks_per_frame.max(1),
            max_frames: max_frames.max(1),
        }
    }
}

impl System for AnimateByVelocity {
    fn name(&self) -> &'static str {
        "animate_by_velocity"
    }

    fn signature(&self) -> Signature {
        Signature::VEL | Signature::SPRITE | Signature::ANIM
    }

    fn run(&mut self, world: &mut World, entities: &[Entity]) {
        let store = world.entities.components_mut();
        for entity in entities {
            let i = entity.index();
            let vel = store.vel[i];
            let anim = &mut store.anim[i];
            if vel.is_zero() {
                anim.frame = 0;
                anim.ticks = 0;
            } else {
                let direction = Direction::from_velocity(vel);
                if direction != anim.direction {
                    trace!("{entity} turned {direction:?}");
                }
                anim.direction = direction;
                anim.ticks += 1;
                if anim.ticks >= self.ticks_per_frame {
                    anim.ticks = 0;
                    anim.frame = (anim.frame + 1) % self.max_frames;
                }
            }
            let (frame, row) = (anim.frame, anim.direction.row());
            let sprite = &mut store.sprite[i];
            sprite.offset_x = frame as i32;
            sprite.offset_y = row;
        }
    }
}
