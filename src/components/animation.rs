use crate::components::vec2::IVec2;

/// Facing direction of an animated sprite. The discriminant is the sheet row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Down = 0,
    Up = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Pick the facing direction from a non-zero velocity.
    ///
    /// The dominant axis wins; on a tie the vertical axis is used.
    pub fn from_velocity(vel: IVec2) -> Self {
        if vel.x.unsigned_abs() > vel.y.unsigned_abs() {
            if vel.x > 0 { Direction::Right } else { Direction::Left }
        } else if vel.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Sprite sheet row for this direction.
    pub fn row(self) -> i32 {
        self as i32
    }
}

/// Per-entity animation counters.
///
/// `ticks` counts simulation ticks since the last frame change (or since the
/// last character reveal, for animated text).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimState {
    pub frame: u32,
    pub direction: Direction,
    pub ticks: u32,
}

impl AnimState {
    pub fn reset(&mut self) {
        *self = AnimState::default();
    }
}
