//! Per-entity component data.
//!
//! Components are plain data stored in the structure-of-arrays
//! [`ComponentStore`](crate::entity::store::ComponentStore), one slot per
//! entity. Which slots are meaningful for a given entity is recorded in its
//! [`Signature`](signature::Signature).
//!
//! Submodules overview:
//! - [`animation`] – frame/direction/tick counters and facing direction
//! - [`signature`] – bitmask of component kinds
//! - [`sprite`] – sprite handle plus sheet frame offsets
//! - [`text`] – string content with a visible-length cursor
//! - [`vec2`] – integer vectors in sub-pixel units

pub mod animation;
pub mod signature;
pub mod sprite;
pub mod text;
pub mod vec2;
