//! Live actor set and per-frame update pass
//!
//! Actors are stored in insertion order (ids are monotonic), which is also
//! the update order. Deaths are only collected after the full pass so that
//! removal never skips or double-processes another actor.

use super::actor::{Actor, ActorId, Behavior, EffectKind, Walking};
use super::ai::{self, PreyView};
use super::combat::{self, Attack};
use super::physics::{self, PhysicsBinding};
use super::rect::{WallSet, WallSetId};
use crate::approach;
use crate::settings::{Settings, WorldSettings};

/// Outcome of one sweep
#[derive(Debug, Default)]
pub struct Sweep {
    /// Actors removed this frame, in insertion order
    pub removed: Vec<Actor>,
    /// Coins credited to the player for slain enemies
    pub coins_awarded: u32,
}

/// Which update routine an actor gets
#[derive(Clone, Copy)]
enum Role {
    Player,
    Enemy,
    Effect(EffectKind),
}

/// Owner of every live actor
#[derive(Debug, Clone)]
pub struct Registry {
    actors: Vec<Actor>,
    /// Enemy subset, in insertion order
    enemies: Vec<ActorId>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            enemies: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert `actor`, binding it to `wall_set` unless it is exempt from physics
    pub fn add(&mut self, mut actor: Actor, wall_set: WallSetId, gravity: f32) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        actor.id = id;

        let gravity = if actor.gravity_exempt() { 0.0 } else { gravity };
        actor.physics = actor
            .needs_physics()
            .then_some(PhysicsBinding { wall_set, gravity });

        if actor.is_enemy() {
            self.enemies.push(id);
        }
        self.actors.push(actor);
        id
    }

    /// Remove `id` from the live set and every index, releasing its binding
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let idx = self.index_of(id)?;
        self.enemies.retain(|e| *e != id);
        let mut actor = self.actors.remove(idx);
        actor.physics = None;
        Some(actor)
    }

    #[inline]
    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.binary_search_by_key(&id, |a| a.id).ok()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.index_of(id).map(|i| &self.actors[i])
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.index_of(id).map(|i| &mut self.actors[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Live enemy ids in insertion order
    pub fn enemies(&self) -> &[ActorId] {
        &self.enemies
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|a| matches!(a.behavior, Behavior::Player(_)))
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.actors
            .iter_mut()
            .find(|a| matches!(a.behavior, Behavior::Player(_)))
    }

    /// Advance every live actor by one frame, then sweep the dead
    ///
    /// Per actor, in insertion order: physics step, behavior update, world
    /// clamp. Actors already dead when their turn comes are skipped.
    pub fn tick(&mut self, walls: &[WallSet], settings: &Settings) -> Sweep {
        for i in 0..self.actors.len() {
            if !self.actors[i].is_alive() {
                continue;
            }
            let can_jump = self.step_physics(i, walls, &settings.world);
            self.update_actor(i, can_jump, settings);
            if self.actors[i].physics.is_some() {
                physics::clamp_to_world(&mut self.actors[i], &settings.world);
            }
        }
        self.sweep()
    }

    /// Apply a freshly created hitbox to every enemy it overlaps
    ///
    /// One-shot: the hitbox is not re-checked on later frames.
    /// Returns the number of enemies hit.
    pub fn strike(&mut self, hitbox: ActorId, world: &WorldSettings) -> usize {
        let Some(i) = self.index_of(hitbox) else {
            return 0;
        };
        let Some(attack) = Attack::from_actor(&self.actors[i]) else {
            return 0;
        };
        let bounds = self.actors[i].bounds();
        let targets: Vec<usize> = self
            .enemies
            .iter()
            .filter_map(|id| self.index_of(*id))
            .filter(|&j| {
                combat::is_valid_target(&self.actors[j]) && self.actors[j].bounds().overlaps(&bounds)
            })
            .collect();
        for &j in &targets {
            combat::take_damage(&mut self.actors[j], &attack, world);
        }
        targets.len()
    }

    fn step_physics(&mut self, i: usize, walls: &[WallSet], world: &WorldSettings) -> bool {
        let actor = &mut self.actors[i];
        let Some(binding) = actor.physics else {
            return false;
        };
        let empty = WallSet::default();
        let set = walls.get(binding.wall_set.0).unwrap_or(&empty);
        physics::step(actor, set, world);
        physics::can_jump(actor)
    }

    fn update_actor(&mut self, i: usize, can_jump: bool, settings: &Settings) {
        self.actors[i].tick_cooldowns();
        let role = match &self.actors[i].behavior {
            Behavior::Player(_) => Role::Player,
            Behavior::Enemy(_) => Role::Enemy,
            Behavior::Effect(kind) => Role::Effect(*kind),
        };
        match role {
            Role::Player => self.update_player(i, settings),
            Role::Enemy => self.update_enemy(i, can_jump),
            Role::Effect(EffectKind::Swing) => self.actors[i].health -= 1.0,
            Role::Effect(EffectKind::Arrow) => self.update_arrow(i, &settings.world),
        }
    }

    fn update_player(&mut self, i: usize, settings: &Settings) {
        let player = &mut self.actors[i];
        if let Some(state) = player.player_state() {
            let target = match state.walking {
                Walking::Walking => player.direction.sign() * settings.physics.movement_speed,
                Walking::Idle => 0.0,
            };
            player.vel.x = approach(player.vel.x, target, settings.physics.player_acceleration);
        }

        if player.pos.y < settings.world.fall_death_y {
            log::info!("player fell out of the world");
            player.health = 0.0;
            return;
        }

        if player.hit_cooldown != 0 {
            return;
        }
        // First overlapping enemy in insertion order wins; one hit per eligible frame
        let bounds = player.bounds();
        let hit = self
            .enemies
            .iter()
            .filter_map(|id| self.get(*id))
            .find(|e| e.is_alive() && e.bounds().overlaps(&bounds))
            .and_then(Attack::from_actor);
        if let Some(attack) = hit {
            combat::take_damage(&mut self.actors[i], &attack, &settings.world);
        }
    }

    fn update_enemy(&mut self, i: usize, can_jump: bool) {
        let Behavior::Enemy(enemy) = &self.actors[i].behavior else {
            return;
        };
        let prey = self
            .get(enemy.prey)
            .filter(|p| p.is_alive())
            .map(PreyView::of);

        let actor = &mut self.actors[i];
        if let Some(prey) = prey {
            ai::steer(actor, &prey, can_jump);
        }
        ai::grow(actor);
    }

    fn update_arrow(&mut self, i: usize, world: &WorldSettings) {
        let arrow = &mut self.actors[i];
        arrow.pos += arrow.vel;
        let bounds = arrow.bounds();

        let target = self
            .enemies
            .iter()
            .filter_map(|id| self.index_of(*id))
            .find(|&j| {
                combat::is_valid_target(&self.actors[j]) && self.actors[j].bounds().overlaps(&bounds)
            });
        if let (Some(j), Some(attack)) = (target, Attack::from_actor(&self.actors[i])) {
            combat::take_damage(&mut self.actors[j], &attack, world);
            self.actors[i].health = 0.0;
            return;
        }

        let arrow = &mut self.actors[i];
        arrow.health -= 1.0;
        if arrow.right() < world.left_limit || arrow.left() > world.right_limit {
            arrow.health = 0.0;
        }
    }

    /// Credit slain enemies to the player, then remove every dead actor
    fn sweep(&mut self) -> Sweep {
        let dead: Vec<ActorId> = self
            .actors
            .iter()
            .filter(|a| !a.is_alive())
            .map(|a| a.id)
            .collect();
        if dead.is_empty() {
            return Sweep::default();
        }

        let coins_awarded: u32 = dead
            .iter()
            .filter(|id| self.enemies.contains(id))
            .filter_map(|id| self.get(*id))
            .map(|a| a.value)
            .sum();
        if coins_awarded > 0 {
            if let Some(state) = self.player_mut().and_then(Actor::player_state_mut) {
                state.coins += coins_awarded;
                log::debug!("player earned {} coins (total {})", coins_awarded, state.coins);
            }
        }

        let removed: Vec<Actor> = dead.into_iter().filter_map(|id| self.remove(id)).collect();
        for actor in removed.iter().filter(|a| a.is_enemy()) {
            log::debug!("enemy {} ({}) slain", actor.id.0, actor.appearance.as_str());
        }
        Sweep {
            removed,
            coins_awarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::HIT_COOLDOWN_FRAMES;
    use crate::sim::actor::{Direction, EnemyKind};
    use crate::sim::combat::{arrow, sword_swing};

    const FLOOR: WallSetId = WallSetId(0);

    fn arena() -> Vec<WallSet> {
        vec![WallSet::arena(64.0)]
    }

    /// Registry with a grounded player at `x`
    fn with_player(settings: &Settings, x: f32) -> (Registry, ActorId) {
        let mut reg = Registry::new();
        let mut player = Actor::player(&settings.player);
        player.pos = Vec2::new(x, 96.0);
        let id = reg.add(player, FLOOR, settings.physics.gravity);
        (reg, id)
    }

    fn add_orc(reg: &mut Registry, settings: &Settings, x: f32, prey: ActorId) -> ActorId {
        reg.add(
            Actor::enemy(EnemyKind::Orc, Vec2::new(x, 96.0), prey),
            FLOOR,
            settings.physics.gravity,
        )
    }

    #[test]
    fn test_add_binds_physics() {
        let settings = Settings::default();
        let (mut reg, player) = with_player(&settings, 300.0);
        let dragon = reg.add(
            Actor::enemy(EnemyKind::Dragon, Vec2::new(500.0, 400.0), player),
            FLOOR,
            settings.physics.gravity,
        );
        let p = reg.get(player).unwrap();
        assert_eq!(p.physics.unwrap().gravity, settings.physics.gravity);
        assert_eq!(reg.get(dragon).unwrap().physics.unwrap().gravity, 0.0);
        assert_eq!(reg.enemies(), &[dragon]);

        let swing = sword_swing(p, &settings.player.sword);
        let swing = reg.add(swing, FLOOR, settings.physics.gravity);
        assert!(reg.get(swing).unwrap().physics.is_none());
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_remove_clears_indices() {
        let settings = Settings::default();
        let (mut reg, player) = with_player(&settings, 300.0);
        let orc = add_orc(&mut reg, &settings, 600.0, player);
        let removed = reg.remove(orc).unwrap();
        assert!(removed.physics.is_none());
        assert!(reg.enemies().is_empty());
        assert!(reg.get(orc).is_none());
        assert!(reg.remove(orc).is_none());
    }

    #[test]
    fn test_contact_damage_once_per_cooldown() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 300.0);
        // Two orcs overlapping the player at once
        add_orc(&mut reg, &settings, 320.0, player);
        add_orc(&mut reg, &settings, 330.0, player);

        reg.tick(&walls, &settings);
        let p = reg.get(player).unwrap();
        assert_eq!(p.health, 6.0);
        assert_eq!(p.hit_cooldown, HIT_COOLDOWN_FRAMES);

        for _ in 0..10 {
            reg.tick(&walls, &settings);
        }
        assert_eq!(reg.get(player).unwrap().health, 6.0);
    }

    #[test]
    fn test_slain_enemy_pays_out() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 100.0);
        let orc = add_orc(&mut reg, &settings, 700.0, player);
        reg.get_mut(orc).unwrap().health = 0.0;

        let sweep = reg.tick(&walls, &settings);
        assert_eq!(sweep.coins_awarded, 10);
        assert_eq!(sweep.removed.len(), 1);
        assert!(reg.get(orc).is_none());
        assert!(reg.enemies().is_empty());
        assert_eq!(reg.player().unwrap().player_state().unwrap().coins, 10);
    }

    #[test]
    fn test_sweep_catches_late_kills() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 100.0);
        // Orc updates before the arrow that kills it
        let orc = add_orc(&mut reg, &settings, 600.0, player);
        reg.get_mut(orc).unwrap().health = 1.0;
        let mut shooter = reg.get(player).unwrap().clone();
        shooter.pos = Vec2::new(560.0, 96.0);
        shooter.direction = Direction::Right;
        let shot = arrow(&shooter, &settings.player.bow);
        reg.add(shot, FLOOR, settings.physics.gravity);

        let sweep = reg.tick(&walls, &settings);
        assert!(reg.get(orc).is_none());
        // Orc and the spent arrow
        assert_eq!(sweep.removed.len(), 2);
        assert_eq!(sweep.coins_awarded, 10);
    }

    #[test]
    fn test_strike_hits_each_overlap_once() {
        let settings = Settings::default();
        let (mut reg, player) = with_player(&settings, 300.0);
        let near = add_orc(&mut reg, &settings, 350.0, player);
        let far = add_orc(&mut reg, &settings, 700.0, player);

        let swing = sword_swing(reg.get(player).unwrap(), &settings.player.sword);
        let swing = reg.add(swing, FLOOR, settings.physics.gravity);
        assert_eq!(reg.strike(swing, &settings.world), 1);
        // Re-striking inside the cooldown window does nothing
        assert_eq!(reg.strike(swing, &settings.world), 0);

        let dmg = settings.player.sword.damage;
        assert_eq!(reg.get(near).unwrap().health, 10.0 - dmg);
        assert_eq!(reg.get(far).unwrap().health, 10.0);
    }

    #[test]
    fn test_swing_expires() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 300.0);
        let swing = sword_swing(reg.get(player).unwrap(), &settings.player.sword);
        let swing = reg.add(swing, FLOOR, settings.physics.gravity);
        for _ in 0..settings.player.sword.lifetime - 1 {
            reg.tick(&walls, &settings);
        }
        assert!(reg.get(swing).is_some());
        reg.tick(&walls, &settings);
        assert!(reg.get(swing).is_none());
    }

    #[test]
    fn test_arrow_leaves_world() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 960.0);
        let shot = arrow(reg.get(player).unwrap(), &settings.player.bow);
        let shot = reg.add(shot, FLOOR, settings.physics.gravity);
        for _ in 0..5 {
            reg.tick(&walls, &settings);
        }
        assert!(reg.get(shot).is_none());
    }

    #[test]
    fn test_player_falls_to_death() {
        let settings = Settings::default();
        let walls: Vec<WallSet> = vec![WallSet::default()];
        let (mut reg, player) = with_player(&settings, 300.0);
        let mut sweep = Sweep::default();
        for _ in 0..200 {
            sweep = reg.tick(&walls, &settings);
            if !sweep.removed.is_empty() {
                break;
            }
        }
        assert_eq!(sweep.removed[0].id, player);
        assert!(reg.player().is_none());
    }

    #[test]
    fn test_walking_and_knockback_decay() {
        let settings = Settings::default();
        let walls = arena();
        let (mut reg, player) = with_player(&settings, 300.0);
        {
            let p = reg.get_mut(player).unwrap();
            p.vel.x = 12.0;
        }
        reg.tick(&walls, &settings);
        // Idle: excess velocity bleeds off by the player acceleration
        assert_eq!(reg.get(player).unwrap().vel.x, 7.0);

        {
            let p = reg.get_mut(player).unwrap();
            p.direction = Direction::Left;
            p.player_state_mut().unwrap().walking = Walking::Walking;
        }
        reg.tick(&walls, &settings);
        reg.tick(&walls, &settings);
        reg.tick(&walls, &settings);
        assert_eq!(reg.get(player).unwrap().vel.x, -settings.physics.movement_speed);
    }
}
