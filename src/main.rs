/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new(&config);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Scavenger!");
    if world.day > 0 {
        println!("Days survived: {}", world.day);
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, sound, &kb, config)? {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            match world.phase {
                Phase::Playing => {
                    let events = step::step(world, kb.move_dir());
                    process_sound_events(sound, &events);

                    // Day rollover happens outside the step function so
                    // generation errors surface here, not mid-simulation.
                    if events
                        .iter()
                        .any(|e| matches!(e, GameEvent::DayComplete { .. }))
                    {
                        let carried = world.player.food;
                        world.start_day(world.day + 1, carried)?;
                    }
                }
                Phase::DayIntro => {
                    world.anim_tick += 1;
                    if world.anim_tick >= config.speed.day_banner_ticks {
                        world.phase = Phase::Playing;
                        world.anim_tick = 0;
                    }
                }
                Phase::Title | Phase::GameOver => {
                    world.anim_tick = world.anim_tick.wrapping_add(1);
                }
            }

            // Message timer for non-playing phases (step handles Playing)
            if world.phase != Phase::Playing && world.message_timer > 0 {
                world.message_timer -= 1;
                if world.message_timer == 0 {
                    world.message.clear();
                }
            }

            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::PlayerMoved => sfx.play_step(),
            GameEvent::WallChopped { .. } => sfx.play_chop(),
            GameEvent::FoodPicked { .. } => sfx.play_eat(),
            GameEvent::SodaPicked { .. } => sfx.play_drink(),
            GameEvent::EnemyAttacked { .. } => sfx.play_hit(),
            GameEvent::ExitReached => sfx.play_exit(),
            GameEvent::GameOver { .. } => sfx.play_game_over(),
            GameEvent::DayComplete { .. } => {}
        }
    }
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Start a fresh run on day 1 with a full belly.
fn start_run(world: &mut WorldState) -> Result<(), sim::board::GenerateError> {
    let starting_food = world.rules.starting_food;
    world.start_day(1, starting_food)
}

fn handle_meta(
    world: &mut WorldState,
    _sound: Option<&SoundEngine>,
    kb: &InputState,
    _config: &GameConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.was_pressed(KeyCode::Esc);

    match world.phase {
        Phase::Title => {
            if confirm {
                start_run(world)?;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return Ok(true);
            }
        }

        // The day banner can be skipped with any confirm press.
        Phase::DayIntro => {
            if confirm {
                world.phase = Phase::Playing;
                world.anim_tick = 0;
            }
        }

        Phase::Playing => {
            if esc || kb.any_pressed(KEYS_QUIT) {
                return Ok(true);
            }
        }

        Phase::GameOver => {
            if confirm {
                start_run(world)?;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
