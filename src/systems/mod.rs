//! Engine systems.
//!
//! A system is a behavior bound to a [`Signature`]: each tick the dispatcher
//! queries the entities whose signature contains the system's mask and hands
//! the ids to the system. Two ordered tables exist, one for the simulation
//! tick and one for the render frame.
//!
//! Submodules overview
//! - [`accelerate`] – turn the tick's input sample into acceleration
//! - [`displace`] – integrate acceleration into velocity and position
//! - [`animation`] – pick walk-cycle row and frame from velocity
//! - [`typewriter`] – reveal text a few characters at a time
//! - [`render`] – draw sprites (background first) and texts

pub mod accelerate;
pub mod animation;
pub mod displace;
pub mod render;
pub mod typewriter;

use log::debug;

use crate::backend::Graphics;
use crate::components::signature::Signature;
use crate::entity::{Entity, EntityBuffer};
use crate::resources::gameconfig::AnimationConfig;
use crate::world::World;

use accelerate::Accelerate;
use animation::AnimateByVelocity;
use displace::Displace;
use render::{RenderSprites, RenderTexts};
use typewriter::AnimateText;

/// A simulation behavior.
pub trait System {
    fn name(&self) -> &'static str;

    /// Components an entity must carry to be handed to [`run`](Self::run).
    fn signature(&self) -> Signature;

    /// Advance `entities` by one tick.
    fn run(&mut self, world: &mut World, entities: &[Entity]);
}

/// A render behavior. Gets the world read-only.
pub trait RenderSystem {
    fn name(&self) -> &'static str;

    fn signature(&self) -> Signature;

    fn render(&self, world: &World, entities: &[Entity], gfx: &mut dyn Graphics);
}

/// Ordered simulation behaviors.
#[derive(Default)]
pub struct SystemTable {
    rows: Vec<Box<dyn System>>,
}

impl SystemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard pipeline: accelerate, displace, animate, typewrite.
    pub fn simulation(anim: &AnimationConfig) -> Self {
        Self::new()
            .with(Accelerate)
            .with(Displace)
            .with(AnimateByVelocity::new(anim.ticks_per_frame, anim.max_frames))
            .with(AnimateText::new(
                anim.text_ticks_per_reveal,
                anim.text_chars_per_reveal,
                anim.text_sound.clone(),
            ))
    }

    pub fn with(mut self, system: impl System + 'static) -> Self {
        self.push(system);
        self
    }

    pub fn push(&mut self, system: impl System + 'static) {
        debug!("registered system '{}'", system.name());
        self.rows.push(Box::new(system));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rows.iter().map(|row| row.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Run every row in order, each on a fresh query.
    pub fn run(&mut self, world: &mut World) {
        let mut buf = EntityBuffer::new();
        for row in &mut self.rows {
            world.entities.query_into(row.signature(), &mut buf);
            row.run(world, &buf);
        }
    }
}

/// Ordered render behaviors.
#[derive(Default)]
pub struct RenderTable {
    rows: Vec<Box<dyn RenderSystem>>,
}

impl RenderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites, then texts on top.
    pub fn standard() -> Self {
        Self::new().with(RenderSprites).with(RenderTexts)
    }

    pub fn with(mut self, system: impl RenderSystem + 'static) -> Self {
        self.push(system);
        self
    }

    pub fn push(&mut self, system: impl RenderSystem + 'static) {
        debug!("registered render system '{}'", system.name());
        self.rows.push(Box::new(system));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rows.iter().map(|row| row.name()).collect()
    }

    pub fn render(&self, world: &World, gfx: &mut dyn Graphics) {
        let mut buf = EntityBuffer::new();
        for row in &self.rows {
            world.entities.query_into(row.signature(), &mut buf);
            row.render(world, &buf, gfx);
        }
    }
}
