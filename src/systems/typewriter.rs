//! Typewriter effect for text entities.
//!
//! An animated text starts with a single visible character. Every
//! `ticks_per_reveal` ticks a few more characters appear and the reveal sound
//! plays. Once the whole string is visible the `ANIM` bit is dropped, which
//! takes the entity out of this system for good.

use log::debug;
use smallvec::SmallVec;

use crate::components::signature::Signature;
use crate::entity::Entity;
use crate::systems::System;
use crate::world::World;

/// Volume of the reveal sound.
const REVEAL_VOLUME: f32 = 1.0;

pub struct AnimateText {
    pub ticks_per_reveal: u32,
    pub chars_per_reveal: usize,
    pub sound: Option<String>,
}

impl AnimateText {
    pub fn new(ticks_per_reveal: u32, chars_per_reveal: usize, sound: Option<String>) -> Self {
        Self {
            ticks_per_reveal: ticks_per_reveal.max(1),
            chars_per_reveal: chars_per_reveal.max(1),
            sound,
        }
    }
}

impl System for AnimateText {
    fn name(&self) -> &'static str {
        "animate_text"
    }

    fn signature(&self) -> Signature {
        Signature::TEXT | Signature::SPRITE | Signature::ANIM
    }

    fn run(&mut self, world: &mut World, entities: &[Entity]) {
        let mut finished: SmallVec<[Entity; 8]> = SmallVec::new();
        let store = world.entities.components_mut();
        for &entity in entities {
            let i = entity.index();
            let anim = &mut store.anim[i];
            let text = &mut store.text[i];

            anim.ticks += 1;
            if anim.ticks >= self.ticks_per_reveal {
                anim.ticks = 0;
                text.visible = text.visible.saturating_add(self.chars_per_reveal);
                if let Some(sound) = &self.sound {
                    world.audio.play(sound, REVEAL_VOLUME);
                }
            }
            if text.is_fully_visible() {
                text.visible = text.char_len();
                finished.push(entity);
            }
        }
        for entity in finished {
            debug!("{entity}: text fully revealed");
            world.entities.remove_components(entity, Signature::ANIM);
        }
    }
}
