//! Tux Engine main entry point.
//!
//! Loads the configuration and a JSON scene, then runs the fixed-step loop:
//! every frame, wall-clock time is converted into simulation ticks by the
//! [`TickTimer`], each tick samples input and advances the [`Game`], and one
//! frame is rendered.
//!
//! Without the `raylib` feature the binary runs headless for `--ticks`
//! simulated ticks on a virtual clock and logs what happens.
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib
//! RUST_LOG=debug cargo run -- --ticks 12000
//! ```

// Do not create console on Windows
#![cfg_attr(
    all(target_os = "windows", feature = "raylib"),
    windows_subsystem = "windows"
)]

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use tuxengine::backend::Graphics;
use tuxengine::backend::headless::{HeadlessGraphics, headless_audio_thread};
use tuxengine::backend::InputSample;
use tuxengine::game::Game;
use tuxengine::resources::audio::AudioBridge;
use tuxengine::resources::gameconfig::GameConfig;
use tuxengine::resources::ticktimer::TickTimer;
use tuxengine::scene::Scene;
use tuxengine::world::World;

const DEFAULT_HEADLESS_TICKS: u64 = 12_000;

/// The Legend of Tux: a tiny tick-driven 2D engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Scene to load.
    #[arg(long, value_name = "PATH", default_value = "assets/scene.json")]
    scene: PathBuf,

    /// Stop after this many ticks (headless runs default to 12000).
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Log filter, e.g. `debug` or `tuxengine=trace`. `RUST_LOG` wins.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write the effective configuration to `--config` and exit.
    #[arg(long)]
    write_config: bool,

    /// Run without a window even when built with raylib.
    #[arg(long)]
    headless: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    let loaded = config.load_from_file();

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = loaded {
        warn!("{e}; using defaults");
    }

    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    info!("Hello, world! This is the Legend of Tux!");
    if let Err(e) = run(&cli, &config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &GameConfig) -> Result<(), Box<dyn std::error::Error>> {
    let scene = Scene::load(&cli.scene)?;

    #[cfg(feature = "raylib")]
    if !cli.headless {
        use tuxengine::backend::raylib::{RaylibGraphics, audio_thread};

        let mut gfx = RaylibGraphics::new(config);
        let audio = AudioBridge::spawn(audio_thread);
        let mut world = World::new(Box::new(audio));
        scene.apply(&mut world, &mut gfx)?;
        let mut game = Game::new(world, config);

        let mut last = std::time::Instant::now();
        let clock = move || {
            let now = std::time::Instant::now();
            let elapsed = now - last;
            last = now;
            elapsed
        };
        run_loop(&mut game, &mut gfx, config, clock, cli.ticks);
        return Ok(());
    }

    let mut gfx = HeadlessGraphics::new().with_input_script(demo_walk());
    let audio = AudioBridge::spawn(headless_audio_thread);
    let mut world = World::new(Box::new(audio));
    scene.apply(&mut world, &mut gfx)?;
    let mut game = Game::new(world, config);

    // virtual clock: every frame lasts exactly 1/target_fps
    let frame = Duration::from_secs(1) / config.target_fps.max(1);
    let limit = cli.ticks.unwrap_or(DEFAULT_HEADLESS_TICKS);
    run_loop(&mut game, &mut gfx, config, move || frame, Some(limit));
    info!(
        "headless run done: {} frames, {} entities alive",
        gfx.frames_committed(),
        game.world.entities.live_count()
    );
    Ok(())
}

/// Fixed-step loop until the backend closes or `limit` ticks have run.
fn run_loop(
    game: &mut Game,
    gfx: &mut dyn Graphics,
    config: &GameConfig,
    mut clock: impl FnMut() -> Duration,
    limit: Option<u64>,
) {
    let mut timer = TickTimer::new(config.tick_interval(), config.max_ticks_per_frame);
    let reached = |game: &Game| limit.is_some_and(|limit| game.current_tick() >= limit);
    while gfx.is_running() && !reached(game) {
        for _ in 0..timer.advance(clock()) {
            if reached(game) {
                break;
            }
            let input = gfx.poll_input();
            game.tick(input);
        }
        game.render_frame(gfx);
    }
    info!("stopped at tick {}", game.current_tick());
}

/// Scripted input for headless runs: walk up to the npc, wait, then pick up
/// the sword once it appears.
fn demo_walk() -> Vec<(u32, InputSample)> {
    vec![
        (700, InputSample::from_axes(1, 0)),
        (300, InputSample::from_axes(0, -1)),
        (7_200, InputSample::NONE),
        (400, InputSample::from_axes(1, 0)),
        (3_400, InputSample::NONE),
    ]
}
