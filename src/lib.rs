//! Battle Arena - a side-scrolling knight versus monsters brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platform physics, combat, AI, spawning)
//! - `settings`: Data-driven game balance

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Sprite scale applied to every tile and character
    pub const SPRITE_SCALING: f32 = 0.5;

    /// Screen dimensions (the playable world spans the screen width)
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Source tile size and resulting grid cell size
    pub const SPRITE_PIXEL_SIZE: f32 = 128.0;
    pub const GRID_PIXEL_SIZE: f32 = SPRITE_PIXEL_SIZE * SPRITE_SCALING;

    /// Horizontal world boundaries
    pub const LEFT_LIMIT: f32 = 0.0;
    pub const RIGHT_LIMIT: f32 = 1000.0;

    /// Player falls to death below this height
    pub const FALL_DEATH_Y: f32 = -5.0 * GRID_PIXEL_SIZE;

    /// Physics (per frame)
    pub const MOVEMENT_SPEED: f32 = 10.0 * SPRITE_SCALING;
    pub const JUMP_SPEED: f32 = 20.0 * SPRITE_SCALING;
    pub const GRAVITY: f32 = 0.9 * SPRITE_SCALING;

    /// Frames an actor is immune after taking damage
    pub const HIT_COOLDOWN_FRAMES: u32 = 50;

    /// Enemies grow stronger every this many frames alive
    pub const ENEMY_UPGRADE_INTERVAL: u32 = 1000;
    /// Multiplier applied to enemy health and damage on each upgrade
    pub const ENEMY_GROWTH_FACTOR: f32 = 1.1;

    /// Horizontal distance within which ground enemies jump after the player
    pub const AGGRO_RADIUS: f32 = 150.0;
    /// Player's feet must be this much higher before an enemy jumps
    pub const JUMP_TRIGGER_MARGIN: f32 = 20.0;

    /// Spawner cadence (frames) and escalation
    pub const SPAWN_COOLDOWN_FRAMES: u32 = 500;
    pub const SPAWN_COUNT_INCREMENT: f32 = 0.1;

    /// Overlaps shallower than this count as touching, not colliding
    pub const CONTACT_EPSILON: f32 = 0.01;
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}
