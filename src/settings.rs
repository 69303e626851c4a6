//! Game balance settings
//!
//! Every tunable of the simulation lives here. Defaults reproduce the
//! shipped game; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// World geometry and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub left_limit: f32,
    pub right_limit: f32,
    /// Player dies when its center drops below this height
    pub fall_death_y: f32,
    /// Edge length of a square wall tile
    pub tile_size: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            left_limit: LEFT_LIMIT,
            right_limit: RIGHT_LIMIT,
            fall_death_y: FALL_DEATH_Y,
            tile_size: GRID_PIXEL_SIZE,
        }
    }
}

/// Platformer physics tunables (units per frame)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub movement_speed: f32,
    pub jump_speed: f32,
    /// How fast the player's walking velocity converges on its target
    pub player_acceleration: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            movement_speed: MOVEMENT_SPEED,
            jump_speed: JUMP_SPEED,
            player_acceleration: MOVEMENT_SPEED,
        }
    }
}

/// Stats of one player weapon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponSettings {
    pub damage: f32,
    pub knockback: f32,
    /// Frames the swing hitbox or projectile lives
    pub lifetime: u32,
    /// Frames between two attacks
    pub cooldown: u32,
    /// Projectile speed (ignored for melee)
    pub speed: f32,
}

/// Player starting state and weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub health: f32,
    pub spawn: Vec2,
    pub sword: WeaponSettings,
    pub bow: WeaponSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            health: 10.0,
            spawn: Vec2::new(2.0 * GRID_PIXEL_SIZE, 3.0 * GRID_PIXEL_SIZE),
            sword: WeaponSettings {
                damage: 3.0,
                knockback: 8.0,
                lifetime: 10,
                cooldown: 20,
                speed: 0.0,
            },
            bow: WeaponSettings {
                damage: 2.0,
                knockback: 4.0,
                lifetime: 90,
                cooldown: 30,
                speed: 12.0,
            },
        }
    }
}

/// Enemy spawner tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Frames between waves
    pub cooldown: u32,
    /// Frames before the first wave
    pub initial_delay: u32,
    /// Starting difficulty (enemies per wave, fractional)
    pub initial_count: f32,
    /// Added to the difficulty after every wave
    pub increment: f32,
    /// Rolls below this spawn a goblin
    pub goblin_threshold: f32,
    /// Rolls below this (and above the goblin threshold) spawn an orc, the rest dragons
    pub orc_threshold: f32,
    /// Fixed spawn locations (actor centers)
    pub points: Vec<Vec2>,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            cooldown: SPAWN_COOLDOWN_FRAMES,
            initial_delay: 120,
            initial_count: 1.0,
            increment: SPAWN_COUNT_INCREMENT,
            goblin_threshold: 0.45,
            orc_threshold: 0.85,
            points: vec![
                Vec2::new(LEFT_LIMIT + GRID_PIXEL_SIZE, 5.0 * GRID_PIXEL_SIZE),
                Vec2::new(RIGHT_LIMIT - GRID_PIXEL_SIZE, 5.0 * GRID_PIXEL_SIZE),
            ],
        }
    }
}

/// Coin prices on the upgrade screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeCosts {
    pub health: u32,
    pub sword_damage: u32,
    pub bow_damage: u32,
    /// Health restored by one health upgrade
    pub health_amount: f32,
    /// Damage added by one weapon upgrade
    pub damage_amount: f32,
}

impl Default for UpgradeCosts {
    fn default() -> Self {
        Self {
            health: 20,
            sword_damage: 30,
            bow_damage: 30,
            health_amount: 5.0,
            damage_amount: 1.0,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldSettings,
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub spawn: SpawnSettings,
    pub upgrades: UpgradeCosts,
}

impl Settings {
    /// Parse settings from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject geometry and probabilities the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });

        if self.world.tile_size <= 0.0 {
            return invalid("world.tile_size", "must be positive");
        }
        if self.world.left_limit >= self.world.right_limit {
            return invalid("world.left_limit", "must be less than right_limit");
        }
        if self.physics.gravity < 0.0 {
            return invalid("physics.gravity", "must not be negative");
        }
        let spawn = &self.spawn;
        if !(0.0..=1.0).contains(&spawn.goblin_threshold)
            || !(0.0..=1.0).contains(&spawn.orc_threshold)
        {
            return invalid("spawn.thresholds", "must lie within [0, 1]");
        }
        if spawn.goblin_threshold > spawn.orc_threshold {
            return invalid("spawn.thresholds", "must be ascending");
        }
        if spawn.points.is_empty() {
            return invalid("spawn.points", "at least one spawn point is required");
        }
        if spawn.cooldown == 0 {
            return invalid("spawn.cooldown", "must be at least one frame");
        }
        if !spawn.increment.is_finite() || spawn.increment < 0.0 {
            return invalid("spawn.increment", "must be finite and not negative");
        }
        if !spawn.initial_count.is_finite() || spawn.initial_count < 0.0 {
            return invalid("spawn.initial_count", "must be finite and not negative");
        }

        let weapons = [
            ("player.sword.lifetime", "player.sword.cooldown", &self.player.sword),
            ("player.bow.lifetime", "player.bow.cooldown", &self.player.bow),
        ];
        for (lifetime, cooldown, weapon) in weapons {
            if weapon.lifetime == 0 {
                return invalid(lifetime, "must be at least one frame");
            }
            if weapon.cooldown == 0 {
                return invalid(cooldown, "must be at least one frame");
            }
        }
        Ok(())
    }
}
