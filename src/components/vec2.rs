//! Integer 2D vector used for positions, sizes, velocities and accelerations.
//!
//! Positions and sizes are stored in hundredths of a pixel ([`SUBPIXELS`]) so
//! that slow movement accumulates without floating point state.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Sub-pixel units per screen pixel.
pub const SUBPIXELS: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const ZERO: IVec2 = IVec2 { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Convert from sub-pixel units to whole screen pixels.
    pub fn to_pixels(self) -> IVec2 {
        IVec2::new(self.x / SUBPIXELS, self.y / SUBPIXELS)
    }
}

impl Add for IVec2 {
    type Output = IVec2;

    fn add(self, rhs: IVec2) -> IVec2 {
        IVec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IVec2 {
    fn add_assign(&mut self, rhs: IVec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixels_truncates_subpixels() {
        assert_eq!(IVec2::new(30099, 250).to_pixels(), IVec2::new(300, 2));
    }

    #[test]
    fn add_assign_accumulates() {
        let mut v = IVec2::new(1, -2);
        v += IVec2::new(4, 4);
        assert_eq!(v, IVec2::new(5, 2));
        assert!(!v.is_zero());
        assert!(IVec2::ZERO.is_zero());
    }
}
