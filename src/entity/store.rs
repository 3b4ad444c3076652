//! Structure-of-arrays component storage.
//!
//! Every field is a fixed-length array indexed by entity slot. Data of deleted
//! entities is left in place: readers go through a live handle (or a query
//! result) so stale slots are never observed. Spawning overwrites the slot.

use crate::components::animation::AnimState;
use crate::components::sprite::Sprite;
use crate::components::text::Text;
use crate::components::vec2::IVec2;
use crate::entity::EntityInfo;

#[derive(Debug, Clone)]
pub struct ComponentStore {
    /// Width and height, in sub-pixels.
    pub dim: Box<[IVec2]>,
    /// Top-left corner, in sub-pixels.
    pub pos: Box<[IVec2]>,
    pub vel: Box<[IVec2]>,
    pub acc: Box<[IVec2]>,
    /// 0 is background; anything else is drawn over it.
    pub zpos: Box<[i32]>,
    pub sprite: Box<[Sprite]>,
    pub text: Box<[Text]>,
    pub anim: Box<[AnimState]>,
}

impl ComponentStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            dim: vec![IVec2::ZERO; capacity].into_boxed_slice(),
            pos: vec![IVec2::ZERO; capacity].into_boxed_slice(),
            vel: vec![IVec2::ZERO; capacity].into_boxed_slice(),
            acc: vec![IVec2::ZERO; capacity].into_boxed_slice(),
            zpos: vec![0; capacity].into_boxed_slice(),
            sprite: vec![Sprite::default(); capacity].into_boxed_slice(),
            text: vec![Text::default(); capacity].into_boxed_slice(),
            anim: vec![AnimState::default(); capacity].into_boxed_slice(),
        }
    }

    /// Initialise slot `index` for a freshly spawned entity.
    ///
    /// Motion and animation state is always zeroed, whatever the signature, so
    /// a recycled slot never inherits its previous occupant's movement.
    pub fn reset_slot(&mut self, index: usize, info: &EntityInfo) {
        self.vel[index] = IVec2::ZERO;
        self.acc[index] = IVec2::ZERO;
        self.anim[index].reset();
        self.sprite[index] = Sprite::new(info.sprite);
        self.pos[index] = IVec2::new(info.x, info.y);
        self.dim[index] = IVec2::new(info.w, info.h);
        self.zpos[index] = info.z;
        self.text[index] = Text::default();
    }
}
