//! Damage, knockback and attack hitboxes
//!
//! All damage goes through `take_damage`, which is gated by the target's
//! hit cooldown so continuous overlap only hurts once per window.

use glam::Vec2;

use super::actor::{Actor, EffectKind};
use super::physics::clamp_to_world;
use crate::consts::HIT_COOLDOWN_FRAMES;
use crate::settings::{WeaponSettings, WorldSettings};

/// A snapshot of the damage an actor deals, detached from the actor so the
/// target can be mutated while the source is still borrowed elsewhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub damage: f32,
    pub knockback: f32,
    /// Center of the attacking actor
    pub origin: Vec2,
}

impl Attack {
    /// The attack `actor` would deal, if it deals damage at all
    pub fn from_actor(actor: &Actor) -> Option<Self> {
        actor.combat.map(|c| Self {
            damage: c.damage,
            knockback: c.knockback,
            origin: actor.pos,
        })
    }
}

/// Knockback impulse pushing `target` away from `source`
///
/// The bearing is measured from the vertical axis: `sin` feeds the
/// horizontal component, `cos` the vertical one. Zero vertical displacement
/// gives a purely horizontal push and zero horizontal displacement a purely
/// vertical one. Coincident centers push to the right.
pub fn knockback_vector(source: Vec2, target: Vec2, magnitude: f32) -> Vec2 {
    let d = target - source;
    if d.y == 0.0 {
        let sign = if d.x < 0.0 { -1.0 } else { 1.0 };
        return Vec2::new(sign * magnitude, 0.0);
    }
    if d.x == 0.0 {
        return Vec2::new(0.0, d.y.signum() * magnitude);
    }
    let angle = d.x.atan2(d.y);
    Vec2::new(angle.sin(), angle.cos()) * magnitude
}

/// Apply `attack` to `target` if its hit cooldown has expired
///
/// Subtracts the damage, adds the knockback impulse to the target's
/// velocity (respecting the world limits) and starts the cooldown.
/// Returns true if damage was applied.
pub fn take_damage(target: &mut Actor, attack: &Attack, world: &WorldSettings) -> bool {
    if target.hit_cooldown != 0 {
        return false;
    }
    target.health -= attack.damage;
    target.vel += knockback_vector(attack.origin, target.pos, attack.knockback);
    target.hit_cooldown = HIT_COOLDOWN_FRAMES;
    clamp_to_world(target, world);

    log::debug!(
        "actor {} took {:.2} damage, health {:.2}",
        target.id.0,
        attack.damage,
        target.health
    );
    true
}

/// Sword swing hitbox adjacent to `attacker` on its facing side
pub fn sword_swing(attacker: &Actor, weapon: &WeaponSettings) -> Actor {
    let mut swing = Actor::effect(EffectKind::Swing, attacker.pos, attacker.direction, weapon);
    swing.pos.x += attacker.direction.sign() * (attacker.size.x + swing.size.x) * 0.5;
    swing
}

/// Arrow leaving `attacker` on its facing side
pub fn arrow(attacker: &Actor, weapon: &WeaponSettings) -> Actor {
    let mut arrow = Actor::effect(EffectKind::Arrow, attacker.pos, attacker.direction, weapon);
    arrow.pos.x += attacker.direction.sign() * (attacker.size.x + arrow.size.x) * 0.5;
    arrow
}

/// True if `actor` can currently be damaged by the player's attacks
#[inline]
pub fn is_valid_target(actor: &Actor) -> bool {
    actor.is_enemy() && actor.is_alive() && actor.hit_cooldown == 0
}
