//! Collaborator interfaces: graphics, input and audio.
//!
//! The simulation core never talks to a window, a GPU or a sound card. It draws
//! through [`Graphics`], reads the player's direction through
//! [`Graphics::poll_input`] and plays sounds through [`AudioSink`]. All calls are
//! synchronous and in-process; audio is fire-and-forget.
//!
//! Backends:
//! - [`headless`] – records draw calls in memory; used by tests and by the
//!   binary's default build.
//! - `raylib` (cargo feature `raylib`) – windowed backend and audio thread.

pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;

use thiserror::Error;

/// Factor applied to both axes when two directions are held at once.
pub const DIAGONAL_SCALE: f32 = 0.7071; // 1/sqrt(2)

/// Opaque handle to a sprite (or bitmap font) owned by the graphics backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle(pub u32);

/// One instantaneous direction sample from the player's input device.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    pub dx: f32,
    pub dy: f32,
}

impl InputSample {
    pub const NONE: InputSample = InputSample { dx: 0.0, dy: 0.0 };

    /// Build a sample from raw axis states (-1, 0 or 1 each).
    ///
    /// Values are clamped to that range and diagonals are scaled by
    /// [`DIAGONAL_SCALE`] so the magnitude stays roughly constant.
    pub fn from_axes(dx: i32, dy: i32) -> Self {
        let dx = dx.clamp(-1, 1) as f32;
        let dy = dy.clamp(-1, 1) as f32;
        if dx != 0.0 && dy != 0.0 {
            Self {
                dx: dx * DIAGONAL_SCALE,
                dy: dy * DIAGONAL_SCALE,
            }
        } else {
            Self { dx, dy }
        }
    }
}

/// Decoded RGBA8 image handed to the backend. The core never parses files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Image {
    /// Single-colour image, used for placeholder sprite sheets.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn check(&self) -> Result<(), BackendError> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || self.rgba.len() != expected {
            return Err(BackendError::InvalidImage(format!(
                "{}x{} image with {} bytes (expected {})",
                self.width,
                self.height,
                self.rgba.len(),
                expected
            )));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("graphics backend: {0}")]
    Graphics(String),
}

/// Drawing, input and frame lifecycle.
///
/// Draw calls are only valid between [`begin_frame`](Graphics::begin_frame)
/// and [`commit_frame`](Graphics::commit_frame). Coordinates are whole screen
/// pixels; `z` orders draws (higher is drawn later).
pub trait Graphics {
    /// Upload an image as a sprite sheet whose frames are `display_w` x `display_h`.
    fn create_sprite(
        &mut self,
        image: &Image,
        display_w: u32,
        display_h: u32,
    ) -> Result<SpriteHandle, BackendError>;

    /// Draw frame (`frame_x`, `frame_y`) of a sprite sheet.
    fn draw_sprite(&mut self, sprite: SpriteHandle, x: i32, y: i32, z: i32, frame_x: i32, frame_y: i32);

    /// Draw the first `visible` characters of `text` with a bitmap font.
    fn draw_text(&mut self, font: SpriteHandle, x: i32, y: i32, z: i32, text: &str, visible: usize);

    /// Current direction held by the player.
    fn poll_input(&mut self) -> InputSample;

    fn begin_frame(&mut self);

    fn commit_frame(&mut self);

    /// False once the user asked to quit.
    fn is_running(&self) -> bool;
}

/// Fire-and-forget sound playback. Implementations must never block and
/// swallow their own failures.
pub trait AudioSink {
    fn play(&self, track: &str, volume: f32);

    /// Make `path` available as `track`. Backends that preload nothing ignore it.
    fn load(&self, _track: &str, _path: &str) {}
}
