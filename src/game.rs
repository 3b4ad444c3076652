//! Tick and frame driver.
//!
//! [`Game`] owns the [`World`] and both system tables. One call to
//! [`Game::tick`] advances the simulation by exactly one tick:
//!
//! 1. store the input sample in the world,
//! 2. run the simulation table,
//! 3. poll collision watches,
//! 4. advance the tick counter,
//! 5. fire scheduled events due at the new tick.
//!
//! Rendering is independent of ticking: [`Game::render_frame`] draws the
//! current state and may be called at any rate.

use log::info;

use crate::backend::{Graphics, InputSample};
use crate::resources::gameconfig::GameConfig;
use crate::systems::{RenderTable, SystemTable};
use crate::world::World;

pub struct Game {
    pub world: World,
    pub systems: SystemTable,
    pub render_systems: RenderTable,
}

impl Game {
    /// Game with the standard system tables tuned by `config`.
    pub fn new(world: World, config: &GameConfig) -> Self {
        let systems = SystemTable::simulation(&config.animation);
        let render_systems = RenderTable::standard();
        info!(
            "game ready: systems {:?}, render {:?}",
            systems.names(),
            render_systems.names()
        );
        Self::with_tables(world, systems, render_systems)
    }

    pub fn with_tables(world: World, systems: SystemTable, render_systems: RenderTable) -> Self {
        Self {
            world,
            systems,
            render_systems,
        }
    }

    /// Simulate one tick with `input` held.
    pub fn tick(&mut self, input: InputSample) {
        let world = &mut self.world;
        world.input = input;
        self.systems.run(world);
        let now = world.tick;
        world.poll_collisions(now);
        world.tick += 1;
        let now = world.tick;
        world.poll_schedule(now);
    }

    /// Simulate `ticks` ticks with the same input.
    pub fn run_ticks(&mut self, ticks: u32, input: InputSample) {
        for _ in 0..ticks {
            self.tick(input);
        }
    }

    /// Draw the current state as one frame.
    pub fn render_frame(&self, gfx: &mut dyn Graphics) {
        gfx.begin_frame();
        self.render_systems.render(&self.world, gfx);
        gfx.commit_frame();
    }

    pub fn current_tick(&self) -> u64 {
        self.world.tick
    }
}
