//! Game session state
//!
//! A `GameState` is one memory-resident run: the arena walls, every live
//! actor, the spawner and the seeded RNG. Input handlers only latch intent
//! into the player (plus the immediate attack); the per-frame work happens
//! in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actor::{Actor, ActorId, Direction, EnemyKind, Walking, Weapon};
use super::combat;
use super::input::{Key, MouseButton};
use super::physics;
use super::rect::{WallSet, WallSetId};
use super::registry::Registry;
use super::spawner::Spawner;
use crate::settings::Settings;

/// The wall set every platform actor collides with
pub const ARENA: WallSetId = WallSetId(0);

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; the upgrade shop is open
    Paused,
    /// The knight died; only a reset continues
    GameOver,
}

/// Purchasable improvements on the pause screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    Health,
    SwordDamage,
    BowDamage,
}

/// Why an upgrade purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("upgrades can only be bought while paused")]
    NotPaused,
    #[error("no living player to upgrade")]
    NoPlayer,
    #[error("upgrade costs {cost} coins, only {coins} available")]
    InsufficientCoins { cost: u32, coins: u32 },
}

/// Read-only view of one actor for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub id: u32,
    pub appearance: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: &'static str,
    pub health: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub coins: u32,
    pub weapon: Option<Weapon>,
    pub actors: Vec<ActorView>,
}

/// One game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    pub(crate) walls: Vec<WallSet>,
    pub registry: Registry,
    pub spawner: Spawner,
    pub(crate) player_id: ActorId,
    /// Coins held when the player died
    pub(crate) final_coins: u32,
}

impl GameState {
    /// Start a fresh session
    pub fn new(settings: Settings, seed: u64) -> Self {
        let walls = vec![WallSet::arena(settings.world.tile_size)];
        let mut registry = Registry::new();
        let player_id = registry.add(
            Actor::player(&settings.player),
            ARENA,
            settings.physics.gravity,
        );
        let spawner = Spawner::new(&settings.spawn);

        log::info!("new session (seed {}), {} walls", seed, walls[0].len());

        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame: 0,
            walls,
            registry,
            spawner,
            player_id,
            final_coins: 0,
        }
    }

    /// Session with default balance
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Settings::default(), seed)
    }

    /// Discard everything and start over with the same settings and seed
    pub fn reset(&mut self) {
        log::info!("session reset");
        *self = Self::new(self.settings.clone(), self.seed);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("paused at frame {}", self.frame);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::info!("resumed at frame {}", self.frame);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn walls(&self) -> &[WallSet] {
        &self.walls
    }

    pub fn player_id(&self) -> ActorId {
        self.player_id
    }

    /// The knight, while alive
    pub fn player(&self) -> Option<&Actor> {
        self.registry.get(self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.registry.get_mut(self.player_id)
    }

    /// Coins held by the player (or held at death)
    pub fn coins(&self) -> u32 {
        self.player()
            .and_then(Actor::player_state)
            .map_or(self.final_coins, |p| p.coins)
    }

    /// True when the player stands on a wall
    pub fn can_player_jump(&self) -> bool {
        self.player().is_some_and(physics::can_jump)
    }

    /// Insert a monster hunting the player
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> ActorId {
        let enemy = Actor::enemy(kind, pos, self.player_id);
        let id = self.registry.add(enemy, ARENA, self.settings.physics.gravity);
        log::debug!("spawned {:?} {} at ({:.0}, {:.0})", kind, id.0, pos.x, pos.y);
        id
    }

    /// Place each kind at a random configured spawn point
    pub(crate) fn spawn_wave(&mut self, kinds: &[EnemyKind]) -> usize {
        let points = self.settings.spawn.points.len();
        if points == 0 {
            return 0;
        }
        for &kind in kinds {
            let pos = self.settings.spawn.points[self.rng.random_range(0..points)];
            self.spawn_enemy(kind, pos);
        }
        kinds.len()
    }

    pub fn on_key_press(&mut self, key: Key) {
        if key == Key::Escape {
            self.toggle_pause();
            return;
        }
        if self.phase != GamePhase::Playing {
            return;
        }

        if key.is_jump() {
            if self.can_player_jump() {
                let jump_speed = self.settings.physics.jump_speed;
                if let Some(player) = self.player_mut() {
                    player.vel.y = jump_speed;
                    player.grounded = false;
                }
            }
            return;
        }

        match key {
            Key::Space => {
                self.attack();
            }
            Key::Digit1 => self.select_weapon(Weapon::Sword),
            Key::Digit2 => self.select_weapon(Weapon::Bow),
            k if k.is_left() || k.is_right() => {
                let world = self.settings.world.clone();
                let Some(player) = self.player_mut() else {
                    return;
                };
                let (direction, can_move) = if k.is_left() {
                    (Direction::Left, player.left() > world.left_limit)
                } else {
                    (Direction::Right, player.right() < world.right_limit)
                };
                if can_move {
                    player.direction = direction;
                    if let Some(state) = player.player_state_mut() {
                        state.walking = Walking::Walking;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn on_key_release(&mut self, key: Key) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(player) = self.player_mut() else {
            return;
        };
        let released = if key.is_left() {
            Some(Direction::Left)
        } else if key.is_right() {
            Some(Direction::Right)
        } else {
            None
        };
        if released == Some(player.direction) {
            if let Some(state) = player.player_state_mut() {
                state.walking = Walking::Idle;
            }
        }
        // Variable jump height: letting go early cuts the rise
        if key.is_jump() && player.vel.y > 0.0 {
            player.vel.y *= 0.5;
        }
    }

    pub fn on_mouse_press(&mut self, button: MouseButton) {
        if self.phase != GamePhase::Playing {
            return;
        }
        match button {
            MouseButton::Left => {
                self.attack();
            }
            MouseButton::Right => {
                if let Some(state) = self.player_mut().and_then(Actor::player_state_mut) {
                    state.weapon = state.weapon.next();
                }
            }
        }
    }

    fn select_weapon(&mut self, weapon: Weapon) {
        if let Some(state) = self.player_mut().and_then(Actor::player_state_mut) {
            state.weapon = weapon;
        }
    }

    /// Use the selected weapon if its cooldown has expired
    ///
    /// A sword swing damages overlapping enemies immediately; an arrow flies
    /// and resolves its hit during later ticks. Returns true if an attack
    /// was made.
    pub fn attack(&mut self) -> bool {
        let Some(player) = self.registry.get(self.player_id) else {
            return false;
        };
        let Some(state) = player.player_state() else {
            return false;
        };
        if state.attack_cooldown > 0 {
            return false;
        }
        let weapon = state.weapon;
        let stats = *state.weapon_stats();
        let effect = match weapon {
            Weapon::Sword => combat::sword_swing(player, &stats),
            Weapon::Bow => combat::arrow(player, &stats),
        };

        let id = self.registry.add(effect, ARENA, self.settings.physics.gravity);
        if let Some(state) = self.player_mut().and_then(Actor::player_state_mut) {
            state.attack_cooldown = stats.cooldown;
        }
        if weapon == Weapon::Sword {
            let hits = self.registry.strike(id, &self.settings.world);
            log::debug!("sword swing hit {} enemies", hits);
        }
        true
    }

    /// Spend coins on an upgrade; returns the coins left
    pub fn buy_upgrade(&mut self, upgrade: Upgrade) -> Result<u32, UpgradeError> {
        if self.phase != GamePhase::Paused {
            return Err(UpgradeError::NotPaused);
        }
        let costs = &self.settings.upgrades;
        let cost = match upgrade {
            Upgrade::Health => costs.health,
            Upgrade::SwordDamage => costs.sword_damage,
            Upgrade::BowDamage => costs.bow_damage,
        };
        let (health_amount, damage_amount) = (costs.health_amount, costs.damage_amount);

        let player = self
            .registry
            .get_mut(self.player_id)
            .ok_or(UpgradeError::NoPlayer)?;
        let coins = player
            .player_state()
            .map(|s| s.coins)
            .ok_or(UpgradeError::NoPlayer)?;
        if coins < cost {
            return Err(UpgradeError::InsufficientCoins { cost, coins });
        }

        if upgrade == Upgrade::Health {
            player.health += health_amount;
        }
        let Some(state) = player.player_state_mut() else {
            return Err(UpgradeError::NoPlayer);
        };
        state.coins -= cost;
        match upgrade {
            Upgrade::SwordDamage => state.sword.damage += damage_amount,
            Upgrade::BowDamage => state.bow.damage += damage_amount,
            Upgrade::Health => {}
        }
        log::info!("bought {:?} for {} coins, {} left", upgrade, cost, state.coins);
        Ok(state.coins)
    }

    /// Read-only view of the current frame
    pub fn snapshot(&self) -> Snapshot {
        let actors = self
            .registry
            .iter()
            .map(|a| ActorView {
                id: a.id.0,
                appearance: a.appearance.as_str(),
                x: a.pos.x,
                y: a.pos.y,
                width: a.size.x,
                height: a.size.y,
                facing: a.direction.as_str(),
                health: a.health.max(0.0),
            })
            .collect();
        Snapshot {
            frame: self.frame,
            phase: self.phase,
            coins: self.coins(),
            weapon: self.player().and_then(Actor::player_state).map(|p| p.weapon),
            actors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;

    /// Session whose player has settled onto the floor
    fn grounded_session() -> GameState {
        let mut state = GameState::with_seed(42);
        // Keep the spawner quiet
        state.spawner.cooldown = u32::MAX;
        for _ in 0..60 {
            tick(&mut state);
        }
        state
    }

    #[test]
    fn test_new_session() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.registry.len(), 1);
        assert_eq!(state.coins(), 0);
        assert_eq!(state.player().unwrap().health, 10.0);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = GameState::with_seed(1);
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        let frame = state.frame;
        tick(&mut state);
        assert_eq!(state.frame, frame);
        state.on_key_press(Key::Escape);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_starts_fresh() {
        let mut state = grounded_session();
        state.spawn_enemy(EnemyKind::Orc, Vec2::new(800.0, 96.0));
        state.reset();
        assert_eq!(state.frame, 0);
        assert_eq!(state.registry.len(), 1);
        assert!(state.registry.enemies().is_empty());
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut state = grounded_session();
        assert!(state.can_player_jump());
        state.on_key_press(Key::W);
        assert_eq!(state.player().unwrap().vel.y, state.settings.physics.jump_speed);
        // Leaving the ground is immediate, a second press cannot re-trigger
        assert!(!state.can_player_jump());

        tick(&mut state);
        assert!(!state.can_player_jump());
        let vy = state.player().unwrap().vel.y;
        state.on_key_press(Key::Up);
        assert_eq!(state.player().unwrap().vel.y, vy);

        // Releasing jump while rising halves the rise
        state.on_key_release(Key::Up);
        assert_eq!(state.player().unwrap().vel.y, vy * 0.5);
    }

    #[test]
    fn test_no_jump_while_dropping_onto_floor() {
        let mut state = GameState::with_seed(42);
        state.spawner.cooldown = u32::MAX;
        {
            let player = state.player_mut().unwrap();
            // Feet half a unit above the floor top
            player.pos.y = 64.5 + player.size.y * 0.5;
            player.vel.y = 0.0;
        }
        tick(&mut state);
        assert!(!state.can_player_jump());
        let vy = state.player().unwrap().vel.y;
        assert!(vy < 0.0);
        state.on_key_press(Key::Up);
        assert_eq!(state.player().unwrap().vel.y, vy);

        tick(&mut state);
        assert!(state.can_player_jump());
    }

    #[test]
    fn test_walk_and_release() {
        let mut state = grounded_session();
        state.on_key_press(Key::A);
        {
            let player = state.player().unwrap();
            assert_eq!(player.direction, Direction::Left);
            assert_eq!(player.player_state().unwrap().walking, Walking::Walking);
        }
        // Releasing the opposite key does not stop the walk
        state.on_key_release(Key::D);
        assert_eq!(
            state.player().unwrap().player_state().unwrap().walking,
            Walking::Walking
        );
        state.on_key_release(Key::Left);
        assert_eq!(
            state.player().unwrap().player_state().unwrap().walking,
            Walking::Idle
        );
    }

    #[test]
    fn test_cannot_walk_past_limit() {
        let mut state = grounded_session();
        let half = state.player().unwrap().size.x * 0.5;
        state.player_mut().unwrap().pos.x = half;
        state.on_key_press(Key::Left);
        assert_eq!(
            state.player().unwrap().player_state().unwrap().walking,
            Walking::Idle
        );
    }

    #[test]
    fn test_sword_hits_adjacent_enemy() {
        let mut state = grounded_session();
        let px = state.player().unwrap().pos.x;
        let orc = state.spawn_enemy(EnemyKind::Orc, Vec2::new(px + 50.0, 96.0));
        assert!(state.attack());
        let sword = state.settings.player.sword;
        assert_eq!(state.registry.get(orc).unwrap().health, 10.0 - sword.damage);
        // Attack is on cooldown
        assert!(!state.attack());
    }

    #[test]
    fn test_bow_selection_and_shot() {
        let mut state = grounded_session();
        state.on_key_press(Key::Digit2);
        assert_eq!(state.snapshot().weapon, Some(Weapon::Bow));
        state.on_mouse_press(MouseButton::Left);
        assert_eq!(state.registry.len(), 2);
        state.on_mouse_press(MouseButton::Right);
        assert_eq!(state.snapshot().weapon, Some(Weapon::Sword));
    }

    #[test]
    fn test_upgrade_shop() {
        let mut state = grounded_session();
        assert_eq!(state.buy_upgrade(Upgrade::Health), Err(UpgradeError::NotPaused));

        state.pause();
        assert_eq!(
            state.buy_upgrade(Upgrade::Health),
            Err(UpgradeError::InsufficientCoins { cost: 20, coins: 0 })
        );

        state
            .player_mut()
            .and_then(Actor::player_state_mut)
            .unwrap()
            .coins = 50;
        assert_eq!(state.buy_upgrade(Upgrade::Health), Ok(30));
        assert_eq!(state.player().unwrap().health, 15.0);
        assert_eq!(state.buy_upgrade(Upgrade::SwordDamage), Ok(0));
        let sword = state.player().unwrap().player_state().unwrap().sword;
        assert_eq!(sword.damage, state.settings.player.sword.damage + 1.0);
    }

    #[test]
    fn test_snapshot_lists_actors() {
        let mut state = grounded_session();
        state.spawn_enemy(EnemyKind::Goblin, Vec2::new(800.0, 200.0));
        let snap = state.snapshot();
        assert_eq!(snap.actors.len(), 2);
        assert_eq!(snap.actors[0].appearance, "knight-sword");
        assert_eq!(snap.actors[1].appearance, "goblin");
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }

    #[test]
    fn test_input_ignored_while_paused() {
        let mut state = grounded_session();
        state.pause();
        state.on_key_press(Key::D);
        assert_eq!(
            state.player().unwrap().player_state().unwrap().walking,
            Walking::Idle
        );
        assert!(!state.registry.iter().any(|a| a.id != state.player_id()));
    }
}
