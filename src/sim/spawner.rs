//! Enemy wave spawner
//!
//! Every cooldown window the difficulty grows by a fixed increment and
//! `floor(enemy_count)` monsters are rolled. There is no upper bound.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::EnemyKind;
use crate::settings::SpawnSettings;

/// Spawn timer and difficulty ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Frames until the next wave
    pub cooldown: u32,
    /// Enemies per wave (fractional part accumulates across waves)
    pub enemy_count: f32,
    /// Waves spawned so far
    pub waves: u32,
}

impl Spawner {
    pub fn new(settings: &SpawnSettings) -> Self {
        Self {
            cooldown: settings.initial_delay,
            enemy_count: settings.initial_count,
            waves: 0,
        }
    }

    /// Count down one frame; when the window closes, escalate and return
    /// the kinds to spawn this frame
    pub fn update<R: Rng>(&mut self, settings: &SpawnSettings, rng: &mut R) -> Vec<EnemyKind> {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown > 0 {
            return Vec::new();
        }

        self.enemy_count += settings.increment;
        let count = self.enemy_count.floor().max(0.0) as usize;
        let kinds: Vec<EnemyKind> = (0..count)
            .map(|_| choose_kind(rng.random::<f32>(), settings))
            .collect();
        self.cooldown = settings.cooldown;
        self.waves += 1;

        log::info!(
            "wave {}: spawning {} enemies (difficulty {:.2})",
            self.waves,
            kinds.len(),
            self.enemy_count
        );
        kinds
    }
}

/// Map a uniform roll in `[0, 1)` onto an enemy kind using the configured
/// thresholds
pub fn choose_kind(roll: f32, settings: &SpawnSettings) -> EnemyKind {
    if roll < settings.goblin_threshold {
        EnemyKind::Goblin
    } else if roll < settings.orc_threshold {
        EnemyKind::Orc
    } else {
        EnemyKind::Dragon
    }
}
