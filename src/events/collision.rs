//! Pairwise collision watches.
//!
//! A watch names two entities and a callback. [`poll_collisions`] tests every
//! active watch once per tick and invokes the callback when the two entities'
//! boxes overlap. One-shot watches are removed after their first firing;
//! recurring watches stay active and fire on every overlapping tick.
//!
//! Boxes are anchored at the entity's position (top-left corner) and span its
//! dimensions. Touching edges do not count as overlap.
//!
//! A watch whose entities are gone, or no longer carry both `POS` and `DIM`,
//! is logged and deactivated without firing.

use log::{error, trace, warn};
use smallvec::SmallVec;

use crate::components::signature::Signature;
use crate::components::vec2::IVec2;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::world::World;

/// Number of watch slots.
pub const MAX_WATCHES: usize = 256;

/// Callback invoked with the world and the watched pair, in watch order.
pub type CollisionCallback = Box<dyn FnMut(&mut World, Entity, Entity)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId {
    index: u32,
    generation: u32,
}

impl WatchId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

struct Watch {
    active: bool,
    recurring: bool,
    generation: u32,
    first: Entity,
    second: Entity,
    callback: Option<CollisionCallback>,
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            active: false,
            recurring: false,
            generation: 0,
            first: Entity::new(0, 0),
            second: Entity::new(0, 0),
            callback: None,
        }
    }
}

/// Axis-aligned overlap of two boxes given by top-left corner and size.
pub fn overlaps(pos_a: IVec2, dim_a: IVec2, pos_b: IVec2, dim_b: IVec2) -> bool {
    pos_a.x < pos_b.x + dim_b.x
        && pos_a.x + dim_a.x > pos_b.x
        && pos_a.y < pos_b.y + dim_b.y
        && pos_a.y + dim_a.y > pos_b.y
}

pub struct CollisionWatcher {
    slots: Vec<Watch>,
    capacity: usize,
}

impl Default for CollisionWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWatcher {
    pub fn new() -> Self {
        Self::with_capacity(MAX_WATCHES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of active watches.
    pub fn active(&self) -> usize {
        self.slots.iter().filter(|w| w.active).count()
    }

    /// Watch `first` and `second` for overlap.
    pub fn watch<F>(
        &mut self,
        first: Entity,
        second: Entity,
        callback: F,
        recurring: bool,
    ) -> Result<WatchId, CoreError>
    where
        F: FnMut(&mut World, Entity, Entity) + 'static,
    {
        let index = match self.slots.iter().position(|w| !w.active) {
            Some(index) => index,
            None if self.slots.len() < self.capacity => {
                self.slots.push(Watch::default());
                self.slots.len() - 1
            }
            None => {
                error!("reached limit of collision watches ({})", self.capacity);
                return Err(CoreError::AtCapacity {
                    table: "collision",
                    capacity: self.capacity,
                });
            }
        };
        let slot = &mut self.slots[index];
        slot.active = true;
        slot.recurring = recurring;
        slot.first = first;
        slot.second = second;
        slot.callback = Some(Box::new(callback));
        trace!("watching {first} and {second} (#{index}, recurring: {recurring})");
        Ok(WatchId {
            index: index as u32,
            generation: slot.generation,
        })
    }

    /// Stop a watch. Returns false if it was already inactive.
    pub fn unwatch(&mut self, id: WatchId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                Self::retire(slot);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, id: WatchId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|w| w.active && w.generation == id.generation)
    }

    fn slot_mut(&mut self, id: WatchId) -> Option<&mut Watch> {
        self.slots
            .get_mut(id.index())
            .filter(|w| w.active && w.generation == id.generation)
    }

    fn retire(slot: &mut Watch) {
        slot.active = false;
        slot.callback = None;
        slot.generation = slot.generation.wrapping_add(1);
    }

    fn snapshot(&self) -> SmallVec<[WatchId; 16]> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, w)| w.active)
            .map(|(index, w)| WatchId {
                index: index as u32,
                generation: w.generation,
            })
            .collect()
    }

    /// Give the callback back after it ran. One-shot watches, and watches
    /// stopped by their own callback, are retired instead.
    fn finish(&mut self, id: WatchId, callback: CollisionCallback) {
        if let Some(slot) = self.slot_mut(id) {
            if slot.recurring {
                slot.callback = Some(callback);
            } else {
                Self::retire(slot);
            }
        }
    }
}

/// Test every active watch and fire the overlapping ones. Returns how many fired.
///
/// Watches added by callbacks during this pass are first tested on the next one.
pub fn poll_collisions(world: &mut World, tick: u64) -> usize {
    let mut fired = 0;
    for id in world.collisions.snapshot() {
        let Some(slot) = world.collisions.slot_mut(id) else {
            continue;
        };
        let (first, second) = (slot.first, slot.second);

        let needs = Signature::POS | Signature::DIM;
        let (Some((pos_a, dim_a)), Some((pos_b, dim_b))) = (
            world.entities.bounds(first),
            world.entities.bounds(second),
        ) else {
            let reason = if world.entities.is_alive(first) && world.entities.is_alive(second) {
                "lacks position or dimensions"
            } else {
                "no longer exists"
            };
            warn!("collision watch #{} on {first}/{second}: entity {reason} ({needs:?}), dropping", id.index);
            world.collisions.unwatch(id);
            continue;
        };

        if !overlaps(pos_a, dim_a, pos_b, dim_b) {
            continue;
        }
        let Some(slot) = world.collisions.slot_mut(id) else {
            continue;
        };
        let Some(mut callback) = slot.callback.take() else {
            continue;
        };
        trace!("collision of {first} and {second} at tick {tick}");
        callback(world, first, second);
        world.collisions.finish(id, callback);
        fired += 1;
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityInfo;
    use std::cell::Cell;
    use std::rc::Rc;

    fn spawn_box(world: &mut World, x: i32, y: i32, w: i32, h: i32) -> Entity {
        world
            .entities
            .spawn(EntityInfo {
                signature: Signature::POS | Signature::DIM,
                x,
                y,
                w,
                h,
                ..Default::default()
            })
            .unwrap()
    }

    fn counting(hits: &Rc<Cell<u32>>) -> impl FnMut(&mut World, Entity, Entity) + 'static {
        let hits = hits.clone();
        move |_, _, _| hits.set(hits.get() + 1)
    }

    #[test]
    fn overlap_uses_width_and_height() {
        let origin = IVec2::new(0, 0);
        let wide = IVec2::new(100, 10);
        // overlaps on x, but b sits below a's height
        assert!(!overlaps(origin, wide, IVec2::new(50, 20), wide));
        assert!(overlaps(origin, wide, IVec2::new(50, 5), wide));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let size = IVec2::new(100, 100);
        assert!(!overlaps(IVec2::new(0, 0), size, IVec2::new(100, 0), size));
        assert!(!overlaps(IVec2::new(0, 0), size, IVec2::new(0, 100), size));
        assert!(overlaps(IVec2::new(0, 0), size, IVec2::new(99, 99), size));
    }

    #[test]
    fn one_shot_watch_fires_once() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 50, 50, 100, 100);
        let hits = Rc::new(Cell::new(0));
        world.collisions.watch(a, b, counting(&hits), false).unwrap();

        assert_eq!(poll_collisions(&mut world, 0), 1);
        assert_eq!(poll_collisions(&mut world, 1), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(world.collisions.active(), 0);
    }

    #[test]
    fn separated_boxes_do_not_fire() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 50, 50, 100, 100);
        world.entities.set_position(b, IVec2::new(500, 500));
        let hits = Rc::new(Cell::new(0));
        world.collisions.watch(a, b, counting(&hits), false).unwrap();
        for tick in 0..10 {
            poll_collisions(&mut world, tick);
        }
        assert_eq!(hits.get(), 0);
        assert_eq!(world.collisions.active(), 1);
    }

    #[test]
    fn recurring_watch_fires_every_overlapping_tick() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 10, 10, 10, 10);
        let hits = Rc::new(Cell::new(0));
        let id = world.collisions.watch(a, b, counting(&hits), true).unwrap();
        for tick in 0..3 {
            poll_collisions(&mut world, tick);
        }
        assert_eq!(hits.get(), 3);
        assert!(world.collisions.is_active(id));
        world.entities.set_position(b, IVec2::new(1000, 0));
        poll_collisions(&mut world, 3);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn callback_receives_pair_in_watch_order() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 50, 50, 100, 100);
        world
            .collisions
            .watch(
                b,
                a,
                move |world, first, second| {
                    assert_eq!((first, second), (b, a));
                    world.entities.delete(first);
                },
                false,
            )
            .unwrap();
        poll_collisions(&mut world, 0);
        assert!(!world.entities.is_alive(b));
        assert!(world.entities.is_alive(a));
    }

    #[test]
    fn watch_on_deleted_entity_is_dropped() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 0, 0, 100, 100);
        let hits = Rc::new(Cell::new(0));
        world.collisions.watch(a, b, counting(&hits), true).unwrap();
        world.entities.delete(b);
        // the slot is reused by an overlapping box, which must not fire the old watch
        spawn_box(&mut world, 0, 0, 100, 100);
        assert_eq!(poll_collisions(&mut world, 0), 0);
        assert_eq!(hits.get(), 0);
        assert_eq!(world.collisions.active(), 0);
    }

    #[test]
    fn watch_on_entity_without_dimensions_is_dropped() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 0, 0, 100, 100);
        world.entities.remove_components(b, Signature::DIM);
        let hits = Rc::new(Cell::new(0));
        world.collisions.watch(a, b, counting(&hits), false).unwrap();
        assert_eq!(poll_collisions(&mut world, 0), 0);
        assert_eq!(world.collisions.active(), 0);
    }

    #[test]
    fn watches_added_by_callbacks_wait_for_next_poll() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 50, 50, 100, 100);
        let inner = Rc::new(Cell::new(0));
        let inner_in = inner.clone();
        world
            .collisions
            .watch(
                a,
                b,
                move |world, first, second| {
                    world
                        .collisions
                        .watch(first, second, counting(&inner_in), false)
                        .unwrap();
                },
                false,
            )
            .unwrap();

        assert_eq!(poll_collisions(&mut world, 0), 1);
        assert_eq!(inner.get(), 0);
        assert_eq!(world.collisions.active(), 1);

        assert_eq!(poll_collisions(&mut world, 1), 1);
        assert_eq!(inner.get(), 1);
        assert_eq!(world.collisions.active(), 0);
    }

    #[test]
    fn recurring_watch_can_stop_itself() {
        let mut world = World::headless();
        let a = spawn_box(&mut world, 0, 0, 100, 100);
        let b = spawn_box(&mut world, 0, 0, 100, 100);
        let own = Rc::new(Cell::new(None));
        let own_in = own.clone();
        let id = world
            .collisions
            .watch(
                a,
                b,
                move |world, _, _| {
                    world.collisions.unwatch(own_in.get().unwrap());
                },
                true,
            )
            .unwrap();
        own.set(Some(id));
        assert_eq!(poll_collisions(&mut world, 0), 1);
        assert!(!world.collisions.is_active(id));
        assert_eq!(poll_collisions(&mut world, 1), 0);
    }

    #[test]
    fn full_table_refuses_watch() {
        let mut world = World::headless();
        world.collisions = CollisionWatcher::with_capacity(1);
        let a = spawn_box(&mut world, 0, 0, 1, 1);
        world.collisions.watch(a, a, |_, _, _| {}, false).unwrap();
        assert!(matches!(
            world.collisions.watch(a, a, |_, _, _| {}, false),
            Err(CoreError::AtCapacity { table: "collision", .. })
        ));
    }
}
