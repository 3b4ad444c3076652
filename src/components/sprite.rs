use crate::backend::SpriteHandle;

/// Sprite is identified by an opaque backend handle and a frame offset into its
/// sheet. `offset_x` selects the animation frame (column) and `offset_y` the
/// facing direction (row); both are written by the animation system and read by
/// the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sprite {
    pub handle: SpriteHandle,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Sprite {
    pub fn new(handle: SpriteHandle) -> Self {
        Self {
            handle,
            offset_x: 0,
            offset_y: 0,
        }
    }
}
