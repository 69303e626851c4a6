//! Actor record and per-kind behavior data
//!
//! Every simulated entity (knight, monster, sword swing, arrow) is one
//! `Actor`. What it does each tick is selected by its `Behavior` variant;
//! kind-specific constants live in that variant or in the enemy table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::PhysicsBinding;
use super::rect::Aabb;
use crate::settings::{PlayerSettings, WeaponSettings};

/// Stable actor handle (monotonic, never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
        }
    }
}

/// Player walking intent, latched from input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Walking {
    #[default]
    Idle,
    Walking,
}

/// Selected player attack mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Sword,
    Bow,
}

impl Weapon {
    pub fn next(self) -> Self {
        match self {
            Weapon::Sword => Weapon::Bow,
            Weapon::Bow => Weapon::Sword,
        }
    }
}

/// Appearance key handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    Knight,
    Orc,
    Goblin,
    Dragon,
    SwordSwing,
    Arrow,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Knight => "knight-sword",
            Appearance::Orc => "orc",
            Appearance::Goblin => "goblin",
            Appearance::Dragon => "dragon",
            Appearance::SwordSwing => "sword-swing",
            Appearance::Arrow => "arrow",
        }
    }
}

/// Damage dealt to whatever this actor hits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: f32,
    pub knockback: f32,
}

/// Monster species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Orc,
    Goblin,
    Dragon,
}

/// Static per-species parameters
#[derive(Debug, Clone, Copy)]
pub struct EnemyParams {
    pub health: f32,
    pub damage: f32,
    pub knockback: f32,
    /// Horizontal (and for flyers vertical) speed cap
    pub max_speed: f32,
    pub acceleration: f32,
    pub jump_speed: f32,
    /// Coins awarded on death
    pub value: u32,
    pub size: Vec2,
    /// Flyers ignore gravity and chase on both axes
    pub flying: bool,
}

static ORC: EnemyParams = EnemyParams {
    health: 10.0,
    damage: 4.0,
    knockback: 8.0,
    max_speed: 2.5,
    acceleration: 0.1,
    jump_speed: 9.0,
    value: 10,
    size: Vec2::new(48.0, 64.0),
    flying: false,
};

static GOBLIN: EnemyParams = EnemyParams {
    health: 5.0,
    damage: 2.0,
    knockback: 5.0,
    max_speed: 3.5,
    acceleration: 0.2,
    jump_speed: 11.0,
    value: 5,
    size: Vec2::new(36.0, 44.0),
    flying: false,
};

static DRAGON: EnemyParams = EnemyParams {
    health: 20.0,
    damage: 6.0,
    knockback: 12.0,
    max_speed: 2.0,
    acceleration: 0.05,
    jump_speed: 0.0,
    value: 25,
    size: Vec2::new(80.0, 56.0),
    flying: true,
};

impl EnemyKind {
    pub fn params(self) -> &'static EnemyParams {
        match self {
            EnemyKind::Orc => &ORC,
            EnemyKind::Goblin => &GOBLIN,
            EnemyKind::Dragon => &DRAGON,
        }
    }

    pub fn appearance(self) -> Appearance {
        match self {
            EnemyKind::Orc => Appearance::Orc,
            EnemyKind::Goblin => Appearance::Goblin,
            EnemyKind::Dragon => Appearance::Dragon,
        }
    }
}

/// Knight-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub coins: u32,
    pub weapon: Weapon,
    pub walking: Walking,
    /// Frames until the next attack is allowed
    pub attack_cooldown: u32,
    pub sword: WeaponSettings,
    pub bow: WeaponSettings,
}

impl PlayerState {
    pub fn weapon_stats(&self) -> &WeaponSettings {
        match self.weapon {
            Weapon::Sword => &self.sword,
            Weapon::Bow => &self.bow,
        }
    }
}

/// Monster-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub kind: EnemyKind,
    /// The actor this monster hunts (always the knight)
    pub prey: ActorId,
    pub max_speed: f32,
    pub acceleration: f32,
    pub jump_speed: f32,
    pub flying: bool,
    /// Frames lived, drives periodic self-upgrade
    pub frames_alive: u32,
    /// Number of self-upgrades applied so far
    pub upgrades: u32,
}

/// Transient effect species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Melee hitbox, damages once when created
    Swing,
    /// Projectile, damages the first target it touches
    Arrow,
}

/// What an actor does each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    Player(PlayerState),
    Enemy(EnemyState),
    Effect(EffectKind),
}

/// A simulated, health-bearing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Assigned by the registry on insertion
    pub id: ActorId,
    /// Center position
    pub pos: Vec2,
    /// Per-frame displacement (change_x, change_y)
    pub vel: Vec2,
    pub size: Vec2,
    /// Hit points; for transient effects, frames left to live
    pub health: f32,
    pub direction: Direction,
    pub appearance: Appearance,
    pub combat: Option<CombatStats>,
    /// Frames remaining before the actor may take damage again
    pub hit_cooldown: u32,
    /// Resting on top of a wall after the last physics step
    #[serde(default)]
    pub grounded: bool,
    /// Coins credited to the player on death
    pub value: u32,
    pub physics: Option<PhysicsBinding>,
    pub behavior: Behavior,
}

impl Actor {
    /// The knight at its configured spawn point
    pub fn player(settings: &PlayerSettings) -> Self {
        Self {
            id: ActorId(0),
            pos: settings.spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(40.0, 64.0),
            health: settings.health,
            direction: Direction::Right,
            appearance: Appearance::Knight,
            combat: None,
            hit_cooldown: 0,
            grounded: false,
            value: 0,
            physics: None,
            behavior: Behavior::Player(PlayerState {
                coins: 0,
                weapon: Weapon::Sword,
                walking: Walking::Idle,
                attack_cooldown: 0,
                sword: settings.sword,
                bow: settings.bow,
            }),
        }
    }

    /// A fresh monster of `kind` hunting `prey`
    pub fn enemy(kind: EnemyKind, pos: Vec2, prey: ActorId) -> Self {
        let p = kind.params();
        Self {
            id: ActorId(0),
            pos,
            vel: Vec2::ZERO,
            size: p.size,
            health: p.health,
            direction: Direction::Left,
            appearance: kind.appearance(),
            combat: Some(CombatStats {
                damage: p.damage,
                knockback: p.knockback,
            }),
            hit_cooldown: 0,
            grounded: false,
            value: p.value,
            physics: None,
            behavior: Behavior::Enemy(EnemyState {
                kind,
                prey,
                max_speed: p.max_speed,
                acceleration: p.acceleration,
                jump_speed: p.jump_speed,
                flying: p.flying,
                frames_alive: 0,
                upgrades: 0,
            }),
        }
    }

    /// A short-lived hitbox or projectile carrying `weapon`'s stats
    pub fn effect(kind: EffectKind, pos: Vec2, direction: Direction, weapon: &WeaponSettings) -> Self {
        let (size, vel, appearance) = match kind {
            EffectKind::Swing => (Vec2::new(48.0, 48.0), Vec2::ZERO, Appearance::SwordSwing),
            EffectKind::Arrow => (
                Vec2::new(24.0, 6.0),
                Vec2::new(direction.sign() * weapon.speed, 0.0),
                Appearance::Arrow,
            ),
        };
        Self {
            id: ActorId(0),
            pos,
            vel,
            size,
            health: weapon.lifetime as f32,
            direction,
            appearance,
            combat: Some(CombatStats {
                damage: weapon.damage,
                knockback: weapon.knockback,
            }),
            hit_cooldown: 0,
            grounded: false,
            value: 0,
            physics: None,
            behavior: Behavior::Effect(kind),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.size.x * 0.5
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.behavior, Behavior::Enemy(_))
    }

    /// Actors that walk the platforms; transient effects are exempt
    pub fn needs_physics(&self) -> bool {
        !matches!(self.behavior, Behavior::Effect(_))
    }

    /// Flyers get a physics binding without gravity
    pub fn gravity_exempt(&self) -> bool {
        matches!(&self.behavior, Behavior::Enemy(e) if e.flying)
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Decrement frame cooldowns (once per tick)
    pub fn tick_cooldowns(&mut self) {
        self.hit_cooldown = self.hit_cooldown.saturating_sub(1);
        if let Behavior::Player(p) = &mut self.behavior {
            p.attack_cooldown = p.attack_cooldown.saturating_sub(1);
        }
    }
}
