/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::Duration;

use config::GameConfig;
use domain::entity::{resolve_direction, FrameInput, HeldDirections};
use sim::clock::FrameClock;
use sim::event::GameEvent;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

fn main() {
    logging::init();
    let config = GameConfig::load();

    let mut world = WorldState::new(config.tuning.clone());
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Blast Grid!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    let mut clock = FrameClock::new(Duration::from_millis(config.tuning.max_frame_ms));
    let frame_sleep = Duration::from_millis(config.tuning.frame_ms);

    log::info!("Round started, {} enemies", world.enemies.len());

    loop {
        kb.drain_events()?;
        gp.update();

        if kb.quit_pressed() || gp.cancel_pressed() {
            break;
        }

        if kb.pause_pressed() && !world.phase.is_over() {
            world.paused = !world.paused;
            if !world.paused {
                // Time spent paused must not reach the simulation
                clock.reset();
            }
            log::debug!("paused: {}", world.paused);
        }

        if world.phase.is_over() && (kb.confirm_pressed() || gp.confirm_pressed()) {
            step::restart(world);
            clock.reset();
        }

        let dt = clock.tick();
        let input = FrameInput {
            movement: resolve_direction(merge_held(kb.held_directions(), gp.held_directions())),
            place_bomb: kb.bomb_pressed() || gp.bomb_pressed(),
        };

        let events = step::step(world, input, dt);
        log_events(&events);

        renderer.render(world)?;
        std::thread::sleep(frame_sleep);
    }

    log::info!("Quit after {} frames, pad connected: {}", clock.frame_count, gp.connected);
    Ok(())
}

fn merge_held(a: HeldDirections, b: HeldDirections) -> HeldDirections {
    HeldDirections {
        up: a.up || b.up,
        down: a.down || b.down,
        left: a.left || b.left,
        right: a.right || b.right,
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::StatusChanged { lives, score } => {
                log::debug!("status: lives {lives}, score {score}");
            }
            GameEvent::WallDestroyed { x, y } => log::trace!("wall destroyed at ({x}, {y})"),
            GameEvent::EnemyKilled { x, y } => log::debug!("enemy killed at ({x}, {y})"),
            other => log::trace!("{other:?}"),
        }
    }
}
