//! The simulation state.
//!
//! [`World`] owns everything a tick touches: the entity manager, the scheduler
//! and collision watcher, the name registries, the audio sink, the input
//! sample for the current tick and the tick counter itself. Systems and
//! callbacks receive `&mut World`.

use crate::backend::{AudioSink, InputSample};
use crate::entity::EntityManager;
use crate::events::collision::{CollisionWatcher, poll_collisions};
use crate::events::schedule::{Scheduler, poll_schedule};
use crate::resources::audio::AudioBridge;
use crate::resources::names::EntityNames;
use crate::resources::spritestore::SpriteStore;

pub struct World {
    pub entities: EntityManager,
    pub scheduler: Scheduler,
    pub collisions: CollisionWatcher,
    pub names: EntityNames,
    pub sprites: SpriteStore,
    pub audio: Box<dyn AudioSink>,
    /// Input sampled for the tick being simulated.
    pub input: InputSample,
    /// Ticks simulated so far.
    pub tick: u64,
}

impl World {
    pub fn new(audio: Box<dyn AudioSink>) -> Self {
        Self {
            entities: EntityManager::new(),
            scheduler: Scheduler::new(),
            collisions: CollisionWatcher::new(),
            names: EntityNames::new(),
            sprites: SpriteStore::new(),
            audio,
            input: InputSample::NONE,
            tick: 0,
        }
    }

    /// World whose audio goes nowhere.
    pub fn headless() -> Self {
        let (bridge, _rx) = AudioBridge::detached();
        Self::new(Box::new(bridge))
    }

    /// Fire scheduled events due at `tick`.
    pub fn poll_schedule(&mut self, tick: u64) -> usize {
        poll_schedule(self, tick)
    }

    /// Fire collision watches whose pair overlaps.
    pub fn poll_collisions(&mut self, tick: u64) -> usize {
        poll_collisions(self, tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signature::Signature;
    use crate::entity::EntityInfo;
    use crate::resources::audio::AudioCmd;

    #[test]
    fn callbacks_can_reach_every_part_of_the_world() {
        let (bridge, rx) = AudioBridge::detached();
        let mut world = World::new(Box::new(bridge));
        let sword = world
            .entities
            .spawn(EntityInfo {
                signature: Signature::POS | Signature::DIM,
                w: 10,
                h: 10,
                ..Default::default()
            })
            .unwrap();
        world.names.insert("sword", sword);
        world
            .scheduler
            .schedule(5, |world, _| {
                if let Some(sword) = world.names.resolve("sword", &world.entities) {
                    world.entities.delete(sword);
                }
                world.audio.play("blip", 1.0);
            })
            .unwrap();

        assert_eq!(world.poll_schedule(4), 0);
        assert_eq!(world.poll_schedule(5), 1);
        assert!(!world.entities.is_alive(sword));
        assert_eq!(
            rx.try_recv().unwrap(),
            AudioCmd::PlayFx {
                id: "blip".into(),
                volume: 1.0
            }
        );
    }
}
