//! In-memory backend without a window.
//!
//! [`HeadlessGraphics`] keeps the draw calls of the last committed frame so
//! tests can assert on what would have been drawn, and feeds a scripted input
//! sequence to the simulation. [`headless_audio_thread`] consumes audio commands
//! and only logs them.

use crossbeam_channel::Receiver;
use log::{debug, trace};

use crate::backend::{BackendError, Graphics, Image, InputSample, SpriteHandle};
use crate::resources::audio::AudioCmd;

/// A draw call as submitted by the render systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Sprite {
        sprite: SpriteHandle,
        x: i32,
        y: i32,
        z: i32,
        frame_x: i32,
        frame_y: i32,
    },
    Text {
        font: SpriteHandle,
        x: i32,
        y: i32,
        z: i32,
        text: String,
    },
}

/// Sprite sheet registered with the headless backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetInfo {
    pub width: u32,
    pub height: u32,
    pub display_w: u32,
    pub display_h: u32,
}

#[derive(Debug, Default)]
pub struct HeadlessGraphics {
    sheets: Vec<SheetInfo>,
    pending: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames: u64,
    max_frames: Option<u64>,
    script: Vec<(u32, InputSample)>,
    script_pos: usize,
    script_left: u32,
}

impl HeadlessGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop reporting `is_running` after `frames` committed frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Replay `script` as input: each entry is held for the given number of
    /// polls. The script loops once exhausted; an empty script means no input.
    pub fn with_input_script(mut self, script: Vec<(u32, InputSample)>) -> Self {
        self.script = script.into_iter().filter(|(n, _)| *n > 0).collect();
        self.script_pos = 0;
        self.script_left = self.script.first().map(|(n, _)| *n).unwrap_or(0);
        self
    }

    /// Draw calls of the most recently committed frame, in submission order.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames_committed(&self) -> u64 {
        self.frames
    }

    pub fn sheet(&self, handle: SpriteHandle) -> Option<&SheetInfo> {
        self.sheets.get(handle.0 as usize)
    }
}

impl Graphics for HeadlessGraphics {
    fn create_sprite(
        &mut self,
        image: &Image,
        display_w: u32,
        display_h: u32,
    ) -> Result<SpriteHandle, BackendError> {
        image.check()?;
        let handle = SpriteHandle(self.sheets.len() as u32);
        self.sheets.push(SheetInfo {
            width: image.width,
            height: image.height,
            display_w,
            display_h,
        });
        debug!(
            "created sprite {:?} ({}x{} sheet, {}x{} frames)",
            handle, image.width, image.height, display_w, display_h
        );
        Ok(handle)
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, x: i32, y: i32, z: i32, frame_x: i32, frame_y: i32) {
        self.pending.push(DrawCall::Sprite {
            sprite,
            x,
            y,
            z,
            frame_x,
            frame_y,
        });
    }

    fn draw_text(&mut self, font: SpriteHandle, x: i32, y: i32, z: i32, text: &str, visible: usize) {
        let shown: String = text.chars().take(visible).collect();
        self.pending.push(DrawCall::Text {
            font,
            x,
            y,
            z,
            text: shown,
        });
    }

    fn poll_input(&mut self) -> InputSample {
        if self.script.is_empty() {
            return InputSample::NONE;
        }
        while self.script_left == 0 {
            self.script_pos = (self.script_pos + 1) % self.script.len();
            self.script_left = self.script[self.script_pos].0;
        }
        self.script_left -= 1;
        self.script[self.script_pos].1
    }

    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn commit_frame(&mut self) {
        self.frames += 1;
        trace!("frame {} committed with {} draw calls", self.frames, self.pending.len());
        self.last_frame = std::mem::take(&mut self.pending);
    }

    fn is_running(&self) -> bool {
        self.max_frames.is_none_or(|max| self.frames < max)
    }
}

/// Audio worker for headless runs: logs every command until shutdown.
pub fn headless_audio_thread(rx_cmd: Receiver<AudioCmd>) {
    debug!("[audio] headless thread starting (id={:?})", std::thread::current().id());
    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id, path } => debug!("[audio] fx registered id='{id}' path='{path}'"),
            AudioCmd::PlayFx { id, volume } => trace!("[audio] fx play id='{id}' volume={volume}"),
            AudioCmd::Shutdown => break,
        }
    }
    debug!("[audio] headless thread exiting");
}
