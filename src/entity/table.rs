//! Entity table: existence flags, signatures and generations per slot.
//!
//! The table owns slot allocation. A new entity takes the first slot whose
//! `exists` flag is clear, so ids are reused as soon as they are freed. The
//! high-water mark is one past the highest slot ever allocated; it bounds
//! linear scans but says nothing about how many slots below it are alive.

use crate::components::signature::Signature;
use crate::entity::handle::Entity;

#[derive(Debug, Clone)]
pub struct EntityTable {
    exists: Box<[bool]>,
    signatures: Box<[Signature]>,
    generations: Box<[u32]>,
    high_water: usize,
    live: usize,
}

impl EntityTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            exists: vec![false; capacity].into_boxed_slice(),
            signatures: vec![Signature::empty(); capacity].into_boxed_slice(),
            generations: vec![0; capacity].into_boxed_slice(),
            high_water: 0,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.exists.len()
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Claim the first free slot, or `None` when every slot is taken.
    pub fn allocate(&mut self, signature: Signature) -> Option<Entity> {
        let index = self.exists.iter().position(|exists| !exists)?;
        self.exists[index] = true;
        self.signatures[index] = signature;
        self.live += 1;
        if index >= self.high_water {
            self.high_water = index + 1;
        }
        Some(Entity::new(index as u32, self.generations[index]))
    }

    /// Free the slot of `entity`. Returns false if the handle did not resolve.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let index = entity.index();
        self.exists[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.live -= 1;
        true
    }

    /// Whether `entity` is in range, exists and is of the current generation.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index();
        index < self.capacity()
            && self.exists[index]
            && self.generations[index] == entity.generation()
    }

    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.is_alive(entity).then(|| self.signatures[entity.index()])
    }

    /// Replace the signature of a live entity. Returns false if it is gone.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.signatures[entity.index()] = signature;
        true
    }

    /// Live entities below the high-water mark whose signature contains `mask`,
    /// in slot order.
    pub fn iter_matching(&self, mask: Signature) -> impl Iterator<Item = Entity> + '_ {
        (0..self.high_water).filter_map(move |index| {
            (self.exists[index] && self.signatures[index].matches(mask))
                .then(|| Entity::new(index as u32, self.generations[index]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_fills_first_free_slot() {
        let mut table = EntityTable::new(8);
        let a = table.allocate(Signature::POS).unwrap();
        let b = table.allocate(Signature::POS).unwrap();
        let c = table.allocate(Signature::POS).unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

        assert!(table.release(b));
        let d = table.allocate(Signature::DIM).unwrap();
        assert_eq!(d.index(), 1);
        assert_ne!(d, b);
        assert_eq!(d.generation(), b.generation() + 1);
    }

    #[test]
    fn high_water_mark_does_not_shrink() {
        let mut table = EntityTable::new(8);
        let a = table.allocate(Signature::POS).unwrap();
        let b = table.allocate(Signature::POS).unwrap();
        assert_eq!(table.high_water_mark(), 2);
        table.release(b);
        table.release(a);
        assert_eq!(table.high_water_mark(), 2);
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn stale_handle_is_not_alive() {
        let mut table = EntityTable::new(4);
        let a = table.allocate(Signature::POS).unwrap();
        table.release(a);
        let b = table.allocate(Signature::POS).unwrap();
        assert_eq!(a.index(), b.index());
        assert!(!table.is_alive(a));
        assert!(table.is_alive(b));
        assert!(!table.release(a));
        assert_eq!(table.signature(a), None);
    }

    #[test]
    fn full_table_refuses_allocation() {
        let mut table = EntityTable::new(2);
        assert!(table.allocate(Signature::POS).is_some());
        assert!(table.allocate(Signature::POS).is_some());
        assert!(table.allocate(Signature::POS).is_none());
    }

    #[test]
    fn out_of_range_handle_is_not_alive() {
        let table = EntityTable::new(4);
        assert!(!table.is_alive(Entity::new(99, 0)));
    }

    #[test]
    fn iter_matching_skips_dead_and_partial_slots() {
        let mut table = EntityTable::new(8);
        let a = table.allocate(Signature::POS | Signature::DIM).unwrap();
        let b = table.allocate(Signature::POS).unwrap();
        let c = table.allocate(Signature::POS | Signature::DIM | Signature::VEL).unwrap();
        table.release(a);
        let found: Vec<_> = table.iter_matching(Signature::POS | Signature::DIM).collect();
        assert_eq!(found, vec![c]);
        let all: Vec<_> = table.iter_matching(Signature::empty()).collect();
        assert_eq!(all, vec![b, c]);
    }
}
