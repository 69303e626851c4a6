//! Battle Arena entry point
//!
//! Runs a headless, scripted session against the deterministic simulation
//! and prints the final frame as JSON.
//!
//! Usage: `battle-arena [seed] [frames]`. Set `BATTLE_ARENA_SETTINGS` to a
//! JSON file to override the default tuning.

use battle_arena::sim::{FrameReport, GameState, Key, MouseButton, Upgrade, tick};
use battle_arena::{Settings, SettingsError};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_FRAMES: u64 = 3600;
const SETTINGS_ENV: &str = "BATTLE_ARENA_SETTINGS";

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Battle Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = parse_arg(args.next(), DEFAULT_SEED);
    let frames = parse_arg(args.next(), DEFAULT_FRAMES);

    if let Err(e) = run(seed, frames) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_arg(arg: Option<String>, default: u64) -> u64 {
    match arg {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring non-numeric argument {:?}, using {}", raw, default);
            default
        }),
        None => default,
    }
}

fn load_settings() -> Result<Settings, SettingsError> {
    match std::env::var(SETTINGS_ENV) {
        Ok(path) => Settings::load(path),
        Err(_) => Ok(Settings::default()),
    }
}

fn run(seed: u64, frames: u64) -> Result<(), SettingsError> {
    let settings = load_settings()?;
    settings.validate()?;
    let mut state = GameState::new(settings, seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut totals = FrameReport::default();
    for frame in 0..frames {
        drive(&mut state, frame);
        let report = tick(&mut state);
        totals.spawned += report.spawned;
        totals.slain += report.slain;
        totals.coins_awarded += report.coins_awarded;
        if report.game_over {
            totals.game_over = true;
            break;
        }
    }

    log::info!(
        "finished at frame {}: {} spawned, {} slain, {} coins earned, game over: {}",
        state.frame,
        totals.spawned,
        totals.slain,
        totals.coins_awarded,
        totals.game_over
    );
    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    Ok(())
}

/// Scripted player: patrol the floor, attack on a rhythm, hop now and then,
/// and visit the shop between waves
fn drive(state: &mut GameState, frame: u64) {
    if frame % 240 == 0 {
        let (release, press) = if (frame / 240) % 2 == 0 {
            (Key::Left, Key::Right)
        } else {
            (Key::Right, Key::Left)
        };
        state.on_key_release(release);
        state.on_key_press(press);
    }
    if frame % 25 == 0 {
        state.on_key_press(Key::Space);
    }
    if frame % 90 == 0 {
        state.on_key_press(Key::Up);
    } else if frame % 90 == 8 {
        state.on_key_release(Key::Up);
    }
    if frame % 600 == 300 {
        state.on_mouse_press(MouseButton::Right);
    }
    if frame > 0 && frame % 1200 == 0 {
        state.pause();
        match state.buy_upgrade(Upgrade::SwordDamage) {
            Ok(left) => log::info!("upgraded sword, {} coins left", left),
            Err(e) => log::debug!("shop: {}", e),
        }
        state.resume();
    }
}
