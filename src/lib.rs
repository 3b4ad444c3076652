//! Tux Engine library.
//!
//! A fixed-capacity entity store with signature queries, a tick pipeline of
//! systems, timed and collision callbacks, and the collaborator interfaces
//! (graphics, input, audio) the simulation talks through. Exposed as a
//! library for the binary and for integration tests.

pub mod backend;
pub mod components;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod scene;
pub mod systems;
pub mod world;
