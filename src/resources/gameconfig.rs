//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Every value has a safe
//! default, so a missing file or key only means the default is kept.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! title = The Legend of Tux
//! target_fps = 60
//!
//! [sim]
//! tick_hz = 1000
//! max_ticks_per_frame = 250
//!
//! [animation]
//! ticks_per_frame = 150
//! max_frames = 4
//! text_ticks_per_reveal = 75
//! text_chars_per_reveal = 3
//! text_sound = blip
//!
//! [log]
//! level = info
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_WINDOW_TITLE: &str = "The Legend of Tux";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TICK_HZ: u32 = 1000;
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 250;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Tuning of the animation systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Ticks a walk-cycle frame stays on screen.
    pub ticks_per_frame: u32,
    /// Frames per walk cycle.
    pub max_frames: u32,
    /// Ticks between two typewriter reveals.
    pub text_ticks_per_reveal: u32,
    /// Characters revealed at once.
    pub text_chars_per_reveal: usize,
    /// Track played on each reveal. `None` (written as `none`) for silent text.
    pub text_sound: Option<String>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: 150,
            max_frames: 4,
            text_ticks_per_reveal: 75,
            text_chars_per_reveal: 3,
            text_sound: Some("blip".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    pub window_title: String,
    /// Target frames per second.
    pub target_fps: u32,
    /// Simulation ticks per second.
    pub tick_hz: u32,
    /// Catch-up limit after a slow frame.
    pub max_ticks_per_frame: u32,
    pub animation: AnimationConfig,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            tick_hz: DEFAULT_TICK_HZ,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            animation: AnimationConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, fps={}, tick_hz={}, log={}",
            self.window_width, self.window_height, self.target_fps, self.tick_hz, self.log_level
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();

        // [window] section
        if let Some(width) = uint("window", "width") {
            self.window_width = width as u32;
        }
        if let Some(height) = uint("window", "height") {
            self.window_height = height as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.window_title = title;
        }
        if let Some(fps) = uint("window", "target_fps") {
            self.target_fps = fps as u32;
        }

        // [sim] section
        if let Some(hz) = uint("sim", "tick_hz").filter(|hz| *hz > 0) {
            self.tick_hz = hz as u32;
        }
        if let Some(max) = uint("sim", "max_ticks_per_frame").filter(|max| *max > 0) {
            self.max_ticks_per_frame = max as u32;
        }

        // [animation] section
        let anim = &mut self.animation;
        if let Some(ticks) = uint("animation", "ticks_per_frame").filter(|t| *t > 0) {
            anim.ticks_per_frame = ticks as u32;
        }
        if let Some(frames) = uint("animation", "max_frames").filter(|f| *f > 0) {
            anim.max_frames = frames as u32;
        }
        if let Some(ticks) = uint("animation", "text_ticks_per_reveal").filter(|t| *t > 0) {
            anim.text_ticks_per_reveal = ticks as u32;
        }
        if let Some(chars) = uint("animation", "text_chars_per_reveal").filter(|c| *c > 0) {
            anim.text_chars_per_reveal = chars as usize;
        }
        if let Some(sound) = config.get("animation", "text_sound") {
            // "none" silences the typewriter
            anim.text_sound = (!sound.is_empty() && !sound.eq_ignore_ascii_case("none")).then_some(sound);
        }

        // [log] section
        if let Some(level) = config.get("log", "level") {
            self.log_level = level;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.window_title.clone()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        // [sim] section
        config.set("sim", "tick_hz", Some(self.tick_hz.to_string()));
        config.set("sim", "max_ticks_per_frame", Some(self.max_ticks_per_frame.to_string()));

        // [animation] section
        let anim = &self.animation;
        config.set("animation", "ticks_per_frame", Some(anim.ticks_per_frame.to_string()));
        config.set("animation", "max_frames", Some(anim.max_frames.to_string()));
        config.set(
            "animation",
            "text_ticks_per_reveal",
            Some(anim.text_ticks_per_reveal.to_string()),
        );
        config.set(
            "animation",
            "text_chars_per_reveal",
            Some(anim.text_chars_per_reveal.to_string()),
        );
        config.set(
            "animation",
            "text_sound",
            Some(anim.text_sound.clone().unwrap_or_else(|| "none".to_string())),
        );

        // [log] section
        config.set("log", "level", Some(self.log_level.clone()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Duration of one simulation tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
