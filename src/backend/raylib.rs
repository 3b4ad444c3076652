//! Windowed backend on raylib.
//!
//! [`RaylibGraphics`] owns the window. Draw calls are queued during a frame and
//! flushed in `z` order (stable, so submission order breaks ties) when the frame
//! is committed. Bitmap fonts are ordinary sprite sheets holding 16 glyphs per
//! row in ASCII order.
//!
//! [`audio_thread`] owns the raylib audio device on its own thread and plays
//! sound effects on request.

use crossbeam_channel::Receiver;
use log::{error, info, trace, warn};
use raylib::core::audio::{RaylibAudio, Sound};
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::backend::{BackendError, Graphics, InputSample, SpriteHandle};
use crate::resources::audio::AudioCmd;
use crate::resources::gameconfig::GameConfig;

const GLYPHS_PER_ROW: i32 = 16;
const CLEAR_COLOR: Color = Color::new(24, 20, 37, 255);

struct Sheet {
    texture: Texture2D,
    frame_w: i32,
    frame_h: i32,
}

enum Queued {
    Sprite {
        sprite: SpriteHandle,
        x: i32,
        y: i32,
        frame_x: i32,
        frame_y: i32,
    },
    Text {
        font: SpriteHandle,
        x: i32,
        y: i32,
        text: String,
    },
}

pub struct RaylibGraphics {
    rl: RaylibHandle,
    thread: RaylibThread,
    sheets: Vec<Sheet>,
    queue: Vec<(i32, Queued)>,
}

impl RaylibGraphics {
    pub fn new(config: &GameConfig) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.window_title)
            .build();
        rl.set_target_fps(config.target_fps);
        info!(
            "window {}x{} '{}' at {} fps",
            config.window_width, config.window_height, config.window_title, config.target_fps
        );
        Self {
            rl,
            thread,
            sheets: Vec::new(),
            queue: Vec::new(),
        }
    }

    fn draw_glyphs(d: &mut RaylibDrawHandle, sheet: &Sheet, x: i32, y: i32, text: &str) {
        let (mut cx, mut cy) = (x, y);
        for c in text.chars() {
            if c == '\n' {
                cx = x;
                cy += sheet.frame_h;
                continue;
            }
            let code = if c.is_ascii() { c as i32 } else { '?' as i32 };
            let src = Rectangle::new(
                ((code % GLYPHS_PER_ROW) * sheet.frame_w) as f32,
                ((code / GLYPHS_PER_ROW) * sheet.frame_h) as f32,
                sheet.frame_w as f32,
                sheet.frame_h as f32,
            );
            d.draw_texture_rec(&sheet.texture, src, Vector2::new(cx as f32, cy as f32), Color::WHITE);
            cx += sheet.frame_w;
        }
    }
}

impl Graphics for RaylibGraphics {
    fn create_sprite(
        &mut self,
        image: &crate::backend::Image,
        display_w: u32,
        display_h: u32,
    ) -> Result<SpriteHandle, BackendError> {
        image.check()?;
        let mut img = Image::gen_image_color(image.width as i32, image.height as i32, Color::BLANK);
        for y in 0..image.height {
            for x in 0..image.width {
                if let Some([r, g, b, a]) = image.pixel(x, y) {
                    img.draw_pixel(x as i32, y as i32, Color::new(r, g, b, a));
                }
            }
        }
        let texture = self
            .rl
            .load_texture_from_image(&self.thread, &img)
            .map_err(|e| BackendError::Graphics(e.to_string()))?;
        let handle = SpriteHandle(self.sheets.len() as u32);
        self.sheets.push(Sheet {
            texture,
            frame_w: display_w as i32,
            frame_h: display_h as i32,
        });
        Ok(handle)
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, x: i32, y: i32, z: i32, frame_x: i32, frame_y: i32) {
        self.queue.push((
            z,
            Queued::Sprite {
                sprite,
                x,
                y,
                frame_x,
                frame_y,
            },
        ));
    }

    fn draw_text(&mut self, font: SpriteHandle, x: i32, y: i32, z: i32, text: &str, visible: usize) {
        let text = text.chars().take(visible).collect();
        self.queue.push((z, Queued::Text { font, x, y, text }));
    }

    fn poll_input(&mut self) -> InputSample {
        let axis = |neg: KeyboardKey, pos: KeyboardKey| {
            i32::from(self.rl.is_key_down(pos)) - i32::from(self.rl.is_key_down(neg))
        };
        InputSample::from_axes(
            axis(KeyboardKey::KEY_A, KeyboardKey::KEY_D),
            axis(KeyboardKey::KEY_W, KeyboardKey::KEY_S),
        )
    }

    fn begin_frame(&mut self) {
        self.queue.clear();
    }

    fn commit_frame(&mut self) {
        self.queue.sort_by_key(|(z, _)| *z);
        let queue = std::mem::take(&mut self.queue);
        let sheets = &self.sheets;
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(CLEAR_COLOR);
        for (_, call) in &queue {
            match call {
                Queued::Sprite {
                    sprite,
                    x,
                    y,
                    frame_x,
                    frame_y,
                } => {
                    let Some(sheet) = sheets.get(sprite.0 as usize) else {
                        continue;
                    };
                    let src = Rectangle::new(
                        (frame_x * sheet.frame_w) as f32,
                        (frame_y * sheet.frame_h) as f32,
                        sheet.frame_w as f32,
                        sheet.frame_h as f32,
                    );
                    d.draw_texture_rec(&sheet.texture, src, Vector2::new(*x as f32, *y as f32), Color::WHITE);
                }
                Queued::Text { font, x, y, text } => {
                    if let Some(sheet) = sheets.get(font.0 as usize) {
                        Self::draw_glyphs(&mut d, sheet, *x, *y, text);
                    }
                }
            }
        }
        trace!("drew {} calls", queue.len());
    }

    fn is_running(&self) -> bool {
        !self.rl.window_should_close()
    }
}

/// Entry point of the dedicated audio thread.
///
/// Owns the raylib audio device and every loaded [`Sound`]. Blocks on the
/// command channel until [`AudioCmd::Shutdown`] or until the bridge is gone.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("[audio] failed to initialize audio device: {e}");
            return;
        }
    };
    info!("[audio] thread starting (id={:?})", std::thread::current().id());

    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                Ok(sound) => {
                    info!("[audio] loaded fx id='{id}' path='{path}'");
                    sounds.insert(id, sound);
                }
                Err(e) => warn!("[audio] load failed id='{id}' path='{path}' error='{e}'"),
            },
            AudioCmd::PlayFx { id, volume } => match sounds.get(&id) {
                Some(sound) => {
                    sound.set_volume(volume);
                    sound.play();
                }
                None => warn!("[audio] play requested for unknown fx '{id}'"),
            },
            AudioCmd::Shutdown => break,
        }
    }
    info!("[audio] thread exiting");
}
