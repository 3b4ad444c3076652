//! Name registry for entities.
//!
//! Scenes and callbacks refer to entities by name ("player", "npc"). The
//! registry stores the generation-checked handle, so a name whose entity has
//! been deleted stops resolving instead of pointing at the slot's next owner.

use log::debug;
use rustc_hash::FxHashMap;

use crate::entity::{Entity, EntityManager};

#[derive(Debug, Clone, Default)]
pub struct EntityNames {
    map: FxHashMap<String, Entity>,
}

impl EntityNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `entity`, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, entity: Entity) {
        let name = name.into();
        if let Some(old) = self.map.insert(name.clone(), entity) {
            debug!("name '{name}' rebound from {old} to {entity}");
        }
    }

    /// Raw binding, whether or not the entity still exists.
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.map.get(name).copied()
    }

    /// The named entity, if it is still alive.
    pub fn resolve(&self, name: &str, entities: &EntityManager) -> Option<Entity> {
        self.get(name).filter(|e| entities.is_alive(*e))
    }

    /// Drop bindings whose entity no longer exists. Returns how many went.
    pub fn prune(&mut self, entities: &EntityManager) -> usize {
        let before = self.map.len();
        self.map.retain(|_, e| entities.is_alive(*e));
        before - self.map.len()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
