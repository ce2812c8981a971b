/// Entry point and game loop.
///
/// One thread owns the game state. Each frame drains keyboard/gamepad input
/// and applies moves in arrival order; every `tick_rate_ms` the renderer
/// redraws from a fresh snapshot. Input and redraw never overlap.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use config::GameConfig;
use sim::world::GameState;
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_QUIT};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    let rng = match config.seed {
        Some(seed) => {
            info!("using fixed seed {seed}");
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let mut game = GameState::new(config.grid, rng);
    game.start();

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut game, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for exploring!");
    println!("Worlds Traveled: {}", game.worlds_traveled);
}

fn game_loop<R: Rng>(
    game: &mut GameState<R>,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    renderer.render(&game.snapshot())?;
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            break;
        }

        for dir in kb.directions().chain(gp.directions()) {
            game.move_player(dir);
        }

        if kb.resized || last_tick.elapsed() >= tick_rate {
            renderer.render(&game.snapshot())?;
            last_tick = Instant::now();
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
