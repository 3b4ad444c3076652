//! Entity manager.
//!
//! [`EntityManager`] pairs the [`EntityTable`] (who exists, with which
//! signature) with the [`ComponentStore`] (what data they carry). It is the
//! only way to spawn, delete, inspect and query entities.
//!
//! Capacity is fixed at [`MAX_ENTITIES`]. Running out of slots is reported to
//! the caller; asking for an entity that is gone is logged and treated as a
//! no-op or a not-found result.

pub mod handle;
pub mod store;
pub mod table;

use arrayvec::ArrayVec;
use log::{debug, error, trace, warn};

use crate::backend::SpriteHandle;
use crate::components::animation::AnimState;
use crate::components::signature::Signature;
use crate::components::sprite::Sprite;
use crate::components::text::Text;
use crate::components::vec2::IVec2;
use crate::error::CoreError;

pub use handle::Entity;
pub use store::ComponentStore;
pub use table::EntityTable;

/// Number of entity slots.
pub const MAX_ENTITIES: usize = 1024;

/// Query result buffer able to hold every entity.
pub type EntityBuffer = ArrayVec<Entity, MAX_ENTITIES>;

/// Spawn parameters and the snapshot returned by [`EntityManager::get_info`].
///
/// Positions and sizes are in sub-pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityInfo {
    pub signature: Signature,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub sprite: SpriteHandle,
}

/// Spawn parameters for a text entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInfo {
    pub font: SpriteHandle,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub content: String,
    /// Reveal the text progressively instead of all at once.
    pub animate: bool,
}

#[derive(Debug, Clone)]
pub struct EntityManager {
    table: EntityTable,
    store: ComponentStore,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityManager {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Manager with a custom slot count. Must not exceed [`MAX_ENTITIES`] if
    /// results are collected with [`query`](Self::query).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: EntityTable::new(capacity),
            store: ComponentStore::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn live_count(&self) -> usize {
        self.table.live_count()
    }

    pub fn high_water_mark(&self) -> usize {
        self.table.high_water_mark()
    }

    /// Spawn an entity in the first free slot.
    pub fn spawn(&mut self, info: EntityInfo) -> Result<Entity, CoreError> {
        let Some(entity) = self.table.allocate(info.signature) else {
            error!("reached limit of entities ({})", self.capacity());
            return Err(CoreError::AtCapacity {
                table: "entity",
                capacity: self.capacity(),
            });
        };
        self.store.reset_slot(entity.index(), &info);
        trace!("spawned entity {entity} {:?}", info.signature);
        Ok(entity)
    }

    /// Spawn a text entity. The font doubles as the entity's sprite.
    ///
    /// Animated texts start with one visible character and carry the `ANIM`
    /// bit until the typewriter system has revealed them completely.
    pub fn spawn_text(&mut self, info: TextInfo) -> Result<Entity, CoreError> {
        let mut signature = Signature::POS | Signature::ZPOS | Signature::TEXT | Signature::SPRITE;
        if info.animate {
            signature |= Signature::ANIM;
        }
        let entity = self.spawn(EntityInfo {
            signature,
            x: info.x,
            y: info.y,
            z: info.z,
            w: 0,
            h: 0,
            sprite: info.font,
        })?;
        let mut text = Text::new(info.content, info.font);
        if info.animate {
            text.visible = text.visible.min(1);
        }
        self.store.text[entity.index()] = text;
        Ok(entity)
    }

    /// Snapshot of the spawn fields of a live entity.
    pub fn get_info(&self, entity: Entity) -> Result<EntityInfo, CoreError> {
        let Some(signature) = self.table.signature(entity) else {
            warn!("cannot get info for non-existent entity {entity}");
            return Err(CoreError::NotFound { entity });
        };
        let i = entity.index();
        Ok(EntityInfo {
            signature,
            x: self.store.pos[i].x,
            y: self.store.pos[i].y,
            z: self.store.zpos[i],
            w: self.store.dim[i].x,
            h: self.store.dim[i].y,
            sprite: self.store.sprite[i].handle,
        })
    }

    /// Delete an entity, freeing its slot for the next spawn.
    pub fn delete(&mut self, entity: Entity) {
        if !self.table.release(entity) {
            warn!("cannot delete non-existent entity {entity}");
            return;
        }
        trace!("removed entity {entity}");
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.table.is_alive(entity)
    }

    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.table.signature(entity)
    }

    /// Add component kinds to a live entity's signature.
    ///
    /// The caller is responsible for the matching store slots holding
    /// meaningful data.
    pub fn insert_components(&mut self, entity: Entity, components: Signature) -> bool {
        match self.table.signature(entity) {
            Some(sig) => self.table.set_signature(entity, sig | components),
            None => {
                warn!("cannot add components to non-existent entity {entity}");
                false
            }
        }
    }

    /// Remove component kinds from a live entity's signature.
    pub fn remove_components(&mut self, entity: Entity, components: Signature) -> bool {
        match self.table.signature(entity) {
            Some(sig) => {
                debug!("entity {entity}: removing {components:?}");
                self.table.set_signature(entity, sig - components)
            }
            None => {
                warn!("cannot remove components from non-existent entity {entity}");
                false
            }
        }
    }

    /// Collect into `buf` every live entity whose signature contains `mask`.
    ///
    /// # Panics
    ///
    /// If `buf` cannot hold all matches. With a buffer of [`MAX_ENTITIES`]
    /// this only happens when the manager was built larger than its buffers.
    pub fn query_into<const N: usize>(&self, mask: Signature, buf: &mut ArrayVec<Entity, N>) -> usize {
        buf.clear();
        for entity in self.table.iter_matching(mask) {
            if buf.try_push(entity).is_err() {
                error!("entity id buffer exceeded (capacity {N}, signature {mask:?})");
                panic!("entity id buffer exceeded: more than {N} entities match {mask:?}");
            }
        }
        buf.len()
    }

    /// Live entities whose signature contains `mask`, in slot order.
    pub fn query(&self, mask: Signature) -> EntityBuffer {
        let mut buf = EntityBuffer::new();
        self.query_into(mask, &mut buf);
        buf
    }

    /// Direct access to the component arrays, for systems iterating query results.
    pub fn components(&self) -> &ComponentStore {
        &self.store
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    fn slot(&self, entity: Entity, needs: Signature) -> Option<usize> {
        self.table
            .signature(entity)
            .filter(|sig| sig.matches(needs))
            .map(|_| entity.index())
    }

    pub fn position(&self, entity: Entity) -> Option<IVec2> {
        self.slot(entity, Signature::POS).map(|i| self.store.pos[i])
    }

    pub fn set_position(&mut self, entity: Entity, pos: IVec2) -> bool {
        match self.slot(entity, Signature::POS) {
            Some(i) => {
                self.store.pos[i] = pos;
                true
            }
            None => false,
        }
    }

    /// Position and size of an entity carrying both `POS` and `DIM`.
    pub fn bounds(&self, entity: Entity) -> Option<(IVec2, IVec2)> {
        self.slot(entity, Signature::POS | Signature::DIM)
            .map(|i| (self.store.pos[i], self.store.dim[i]))
    }

    pub fn velocity(&self, entity: Entity) -> Option<IVec2> {
        self.slot(entity, Signature::VEL).map(|i| self.store.vel[i])
    }

    pub fn set_velocity(&mut self, entity: Entity, vel: IVec2) -> bool {
        match self.slot(entity, Signature::VEL) {
            Some(i) => {
                self.store.vel[i] = vel;
                true
            }
            None => false,
        }
    }

    pub fn acceleration(&self, entity: Entity) -> Option<IVec2> {
        self.slot(entity, Signature::ACC).map(|i| self.store.acc[i])
    }

    pub fn sprite(&self, entity: Entity) -> Option<Sprite> {
        self.slot(entity, Signature::SPRITE).map(|i| self.store.sprite[i])
    }

    pub fn text(&self, entity: Entity) -> Option<&Text> {
        self.slot(entity, Signature::TEXT).map(|i| &self.store.text[i])
    }

    /// Animation counters. Still readable after a finished text dropped its
    /// `ANIM` bit, as long as the entity is alive.
    pub fn anim(&self, entity: Entity) -> Option<AnimState> {
        self.is_alive(entity).then(|| self.store.anim[entity.index()])
    }
}
