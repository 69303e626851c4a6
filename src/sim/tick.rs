//! Fixed-step simulation tick
//!
//! One call advances the session by exactly one frame: spawner, then the
//! registry pass (physics, behavior, combat), then the sweep of the dead.

use super::state::{GamePhase, GameState};

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: usize,
    pub slain: usize,
    pub coins_awarded: u32,
    /// The player died this frame
    pub game_over: bool,
}

/// Advance the session by one frame
///
/// Does nothing while paused or after game over.
pub fn tick(state: &mut GameState) -> FrameReport {
    let mut report = FrameReport::default();
    if state.phase != GamePhase::Playing {
        return report;
    }
    state.frame += 1;

    let kinds = state.spawner.update(&state.settings.spawn, &mut state.rng);
    if !kinds.is_empty() {
        report.spawned = state.spawn_wave(&kinds);
    }

    let sweep = state.registry.tick(&state.walls, &state.settings);
    report.coins_awarded = sweep.coins_awarded;
    report.slain = sweep.removed.iter().filter(|a| a.is_enemy()).count();

    if let Some(player) = sweep.removed.iter().find(|a| a.id == state.player_id) {
        state.final_coins = player.player_state().map_or(0, |p| p.coins);
        state.phase = GamePhase::GameOver;
        report.game_over = true;
        log::info!(
            "game over at frame {} with {} coins",
            state.frame,
            state.final_coins
        );
    }

    report
}
