//! Data-driven scene setup.
//!
//! A scene is a JSON document listing the sprites, sounds and entities to
//! create, tile grids to fill, and the collision watches and timed events to
//! install. Watches and events carry a list of [`Action`]s that run when they
//! fire.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "sprites": [
//!     { "key": "tux", "frame_w": 32, "frame_h": 32, "sheet_w": 128, "sheet_h": 128,
//!       "color": [40, 40, 48, 255] }
//!   ],
//!   "sounds": [ { "id": "blip", "path": "assets/blip.snd" } ],
//!   "entities": [
//!     { "name": "player", "sprite": "tux", "x": 30000, "y": 30000, "z": 5,
//!       "w": 3800, "h": 3800, "signature": "DIM | POS | ZPOS | SPRITE" }
//!   ],
//!   "grids": [
//!     { "offset_x": 0, "offset_y": 0, "cell_width": 6400, "cell_height": 6400,
//!       "rows": ["gg", "gg"], "legend": { "g": "grass" } }
//!   ],
//!   "texts": [ { "font": "ibm", "x": 3200, "y": 40000, "z": 1, "content": "Hello" } ],
//!   "watches": [
//!     { "first": { "named": "player" }, "second": { "named": "npc" },
//!       "actions": [ { "action": "play", "track": "blip" } ] }
//!   ],
//!   "schedule": [ { "at_tick": 8000, "actions": [ { "action": "log", "message": "hi" } ] } ]
//! }
//! ```
//!
//! Positions and sizes are in sub-pixels, frame and sheet sizes in pixels.

use log::{error, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::backend::{BackendError, Graphics, Image, SpriteHandle};
use crate::components::signature::Signature;
use crate::entity::{Entity, EntityInfo, TextInfo};
use crate::error::CoreError;
use crate::world::World;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("cannot read scene {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scene: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown sprite '{0}'")]
    UnknownSprite(String),
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Placeholder sprite sheet of a single colour.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpriteDef {
    pub key: String,
    pub frame_w: u32,
    pub frame_h: u32,
    pub sheet_w: u32,
    pub sheet_h: u32,
    #[serde(default = "default_color")]
    pub color: [u8; 4],
}

fn default_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SoundDef {
    pub id: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EntityDef {
    /// Registers the entity under this name.
    pub name: Option<String>,
    /// Sprite key; required when the signature has `SPRITE`.
    pub sprite: Option<String>,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub signature: Signature,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextDef {
    pub font: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
    pub content: String,
    #[serde(default)]
    pub animate: bool,
}

/// Rows of characters; each character found in the legend spawns one tile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GridDef {
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    #[serde(default)]
    pub z: i32,
    pub rows: Vec<String>,
    /// Character to sprite key.
    pub legend: FxHashMap<char, String>,
}

impl GridDef {
    /// Cells present in the legend as `(column, row, sprite key)`.
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.chars().enumerate().filter_map(move |(x, c)| {
                self.legend
                    .get(&c)
                    .map(|key| (x as i32, y as i32, key.as_str()))
            })
        })
    }
}

/// Entity reference inside an action list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// First entity of the colliding pair.
    First,
    /// Second entity of the colliding pair.
    Second,
    /// Entity registered under a name.
    Named(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WatchDef {
    pub first: Target,
    pub second: Target,
    #[serde(default)]
    pub recurring: bool,
    pub actions: Vec<Action>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventDef {
    pub at_tick: u64,
    pub actions: Vec<Action>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Spawn(EntityDef),
    /// Spawn a text entity.
    Say(TextDef),
    Play {
        track: String,
        #[serde(default = "default_volume")]
        volume: f32,
        #[serde(default = "default_times")]
        times: u32,
    },
    Delete {
        target: Target,
    },
    Watch(WatchDef),
    Schedule {
        after_ticks: u64,
        actions: Vec<Action>,
    },
    Log {
        message: String,
    },
}

fn default_volume() -> f32 {
    1.0
}

fn default_times() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Scene {
    pub sprites: Vec<SpriteDef>,
    pub sounds: Vec<SoundDef>,
    pub entities: Vec<EntityDef>,
    pub grids: Vec<GridDef>,
    pub texts: Vec<TextDef>,
    pub watches: Vec<WatchDef>,
    pub schedule: Vec<EventDef>,
}

impl Scene {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json(&text)?;
        info!(
            "loaded scene {:?}: {} sprites, {} entities, {} grids",
            path,
            scene.sprites.len(),
            scene.entities.len(),
            scene.grids.len()
        );
        Ok(scene)
    }

    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Create everything the scene describes in `world`.
    pub fn apply(&self, world: &mut World, gfx: &mut dyn Graphics) -> Result<(), SceneError> {
        for def in &self.sprites {
            let image = Image::solid(def.sheet_w, def.sheet_h, def.color);
            let handle = gfx.create_sprite(&image, def.frame_w, def.frame_h)?;
            if world.sprites.contains(&def.key) {
                warn!("sprite '{}' defined twice, keeping the last one", def.key);
            }
            world.sprites.insert(def.key.clone(), handle);
        }
        for def in &self.sounds {
            world.audio.load(&def.id, &def.path);
        }
        for def in &self.entities {
            spawn_entity(world, def)?;
        }
        for grid in &self.grids {
            let mut tiles = 0;
            for (x, y, key) in grid.iter_cells() {
                let def = EntityDef {
                    name: None,
                    sprite: Some(key.to_string()),
                    x: grid.offset_x + x * grid.cell_width,
                    y: grid.offset_y + y * grid.cell_height,
                    z: grid.z,
                    w: grid.cell_width,
                    h: grid.cell_height,
                    signature: Signature::DIM | Signature::POS | Signature::ZPOS | Signature::SPRITE,
                };
                spawn_entity(world, &def)?;
                tiles += 1;
            }
            info!("spawned {tiles} grid tiles");
        }
        for def in &self.texts {
            spawn_text(world, def)?;
        }
        for def in &self.watches {
            install_watch(world, def, None)?;
        }
        for def in &self.schedule {
            let actions = def.actions.clone();
            world.scheduler.schedule(def.at_tick, move |world, _| {
                run_actions(world, &actions, None);
            })?;
        }
        Ok(())
    }
}

fn sprite_handle(world: &World, key: &Option<String>) -> Result<SpriteHandle, SceneError> {
    match key {
        Some(key) => world
            .sprites
            .get(key)
            .ok_or_else(|| SceneError::UnknownSprite(key.clone())),
        None => Ok(SpriteHandle::default()),
    }
}

fn spawn_entity(world: &mut World, def: &EntityDef) -> Result<Entity, SceneError> {
    let sprite = sprite_handle(world, &def.sprite)?;
    let entity = world.entities.spawn(EntityInfo {
        signature: def.signature,
        x: def.x,
        y: def.y,
        z: def.z,
        w: def.w,
        h: def.h,
        sprite,
    })?;
    if let Some(name) = &def.name {
        world.names.insert(name.clone(), entity);
    }
    Ok(entity)
}

fn spawn_text(world: &mut World, def: &TextDef) -> Result<Entity, SceneError> {
    let font = world
        .sprites
        .get(&def.font)
        .ok_or_else(|| SceneError::UnknownSprite(def.font.clone()))?;
    Ok(world.entities.spawn_text(TextInfo {
        font,
        x: def.x,
        y: def.y,
        z: def.z,
        content: def.content.clone(),
        animate: def.animate,
    })?)
}

fn resolve(world: &World, target: &Target, pair: Option<(Entity, Entity)>) -> Result<Entity, SceneError> {
    match (target, pair) {
        (Target::First, Some((first, _))) => Ok(first),
        (Target::Second, Some((_, second))) => Ok(second),
        (Target::First | Target::Second, None) => {
            Err(SceneError::UnknownEntity(format!("{target:?} outside a collision")))
        }
        (Target::Named(name), _) => world
            .names
            .resolve(name, &world.entities)
            .ok_or_else(|| SceneError::UnknownEntity(name.clone())),
    }
}

fn install_watch(
    world: &mut World,
    def: &WatchDef,
    pair: Option<(Entity, Entity)>,
) -> Result<(), SceneError> {
    let first = resolve(world, &def.first, pair)?;
    let second = resolve(world, &def.second, pair)?;
    let actions = def.actions.clone();
    world.collisions.watch(
        first,
        second,
        move |world, a, b| {
            info!("entity {a} collided with {b}");
            run_actions(world, &actions, Some((a, b)));
        },
        def.recurring,
    )?;
    Ok(())
}

/// Run `actions` in order. A failing action is logged and skipped.
pub fn run_actions(world: &mut World, actions: &[Action], pair: Option<(Entity, Entity)>) {
    for action in actions {
        if let Err(e) = run_action(world, action, pair) {
            error!("scene action {action:?} failed: {e}");
        }
    }
}

fn run_action(world: &mut World, action: &Action, pair: Option<(Entity, Entity)>) -> Result<(), SceneError> {
    match action {
        Action::Spawn(def) => {
            let entity = spawn_entity(world, def)?;
            info!("spawned {entity} at tick {} ({} x {})", world.tick, def.x, def.y);
        }
        Action::Say(def) => {
            let entity = spawn_text(world, def)?;
            info!("spawned text {entity}");
        }
        Action::Play { track, volume, times } => {
            for _ in 0..*times {
                world.audio.play(track, *volume);
            }
        }
        Action::Delete { target } => match resolve(world, target, pair) {
            Ok(entity) => {
                info!("removing entity {entity}");
                world.entities.delete(entity);
                world.names.prune(&world.entities);
            }
            Err(e) => warn!("nothing to delete: {e}"),
        },
        Action::Watch(def) => install_watch(world, def, pair)?,
        Action::Schedule { after_ticks, actions } => {
            let actions = actions.clone();
            let deadline = world.tick + after_ticks;
            world.scheduler.schedule(deadline, move |world, _| {
                run_actions(world, &actions, None);
            })?;
        }
        Action::Log { message } => info!("{message}"),
    }
    Ok(())
}
