//! Component signatures.
//!
//! A [`Signature`] is a set of component kinds. Entities carry one describing
//! which store slots hold meaningful data for them; systems declare one
//! describing what they require. A system runs over exactly the entities whose
//! signature contains the system's signature.
//!
//! In scene files signatures are written as flag names joined by `|`:
//!
//! ```json
//! { "signature": "DIM | POS | ZPOS | SPRITE" }
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bitmask of component kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Signature: u32 {
        /// Width and height.
        const DIM    = 1 << 0;
        /// Position.
        const POS    = 1 << 1;
        /// Velocity.
        const VEL    = 1 << 2;
        /// Acceleration.
        const ACC    = 1 << 3;
        /// Render layer.
        const ZPOS   = 1 << 4;
        /// Sprite handle and animation offsets.
        const SPRITE = 1 << 5;
        /// Animation counters.
        const ANIM   = 1 << 6;
        /// Text content.
        const TEXT   = 1 << 7;
        /// Player-controlled.
        const INPUT  = 1 << 8;
    }
}

impl Signature {
    /// Whether an entity carrying `self` satisfies a system requiring `required`.
    #[inline]
    pub fn matches(self, required: Signature) -> bool {
        self.contains(required)
    }
}
