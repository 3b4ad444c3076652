//! Long-lived state shared by systems and callbacks.
//!
//! Overview
//! - `audio` – bridge and channel to the background audio thread
//! - `gameconfig` – INI-backed settings with safe defaults
//! - `names` – entity handles registered by name
//! - `spritestore` – sprite handles keyed by scene name
//! - `ticktimer` – fixed-step accumulator turning frame time into ticks
pub mod audio;
pub mod gameconfig;
pub mod names;
pub mod spritestore;
pub mod ticktimer;
