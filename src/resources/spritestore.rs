//! Sprite handles keyed by name.
//!
//! Filled while a scene is loaded; lookups afterwards are by the key used in
//! the scene file.

use rustc_hash::FxHashMap;

use crate::backend::SpriteHandle;

#[derive(Debug, Clone, Default)]
pub struct SpriteStore {
    pub map: FxHashMap<String, SpriteHandle>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, handle: SpriteHandle) {
        self.map.insert(key.into(), handle);
    }

    pub fn get(&self, key: &str) -> Option<SpriteHandle> {
        self.map.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
}
