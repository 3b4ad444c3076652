//! Deferred callbacks.
//!
//! Both tables hold boxed closures that receive the whole [`World`](crate::world::World)
//! when they fire, so they can spawn, delete, play sounds, or register further
//! callbacks. Each table is polled once per tick by [`Game`](crate::game::Game).
//!
//! Submodules:
//! - [`schedule`] – one-shot callbacks fired at an absolute tick
//! - [`collision`] – callbacks fired when two watched entities overlap
pub mod collision;
pub mod schedule;
