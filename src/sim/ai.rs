//! Monster pursuit and growth
//!
//! Purely reactive: every tick the monster looks at where its prey is and
//! nudges its velocity. No state is kept besides the velocity itself and the
//! frame counter that drives self-upgrades.

use glam::Vec2;

use super::actor::{Actor, Behavior, Direction};
use crate::consts::{AGGRO_RADIUS, ENEMY_GROWTH_FACTOR, ENEMY_UPGRADE_INTERVAL, JUMP_TRIGGER_MARGIN};

/// What a monster knows about its prey this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreyView {
    pub center: Vec2,
    /// Height of the prey's feet
    pub bottom: f32,
}

impl PreyView {
    pub fn of(actor: &Actor) -> Self {
        Self {
            center: actor.pos,
            bottom: actor.bottom(),
        }
    }
}

/// Accelerate toward `target` on one axis without exceeding `max_speed`
///
/// Speed is only added while below the cap, so a monster knocked back
/// faster than its cap recovers gradually instead of snapping.
#[inline]
fn chase_axis(vel: &mut f32, from: f32, target: f32, max_speed: f32, acceleration: f32) {
    if target > from && *vel < max_speed {
        *vel += acceleration;
    } else if target < from && *vel > -max_speed {
        *vel -= acceleration;
    }
}

/// Steer a monster toward its prey
///
/// `can_jump` is the monster's ground contact this tick. Non-monsters are
/// ignored.
pub fn steer(actor: &mut Actor, prey: &PreyView, can_jump: bool) {
    let Behavior::Enemy(enemy) = &actor.behavior else {
        return;
    };
    let (max_speed, acceleration, jump_speed, flying) =
        (enemy.max_speed, enemy.acceleration, enemy.jump_speed, enemy.flying);

    chase_axis(&mut actor.vel.x, actor.pos.x, prey.center.x, max_speed, acceleration);

    if flying {
        chase_axis(&mut actor.vel.y, actor.pos.y, prey.center.y, max_speed, acceleration);
    } else {
        let prey_above = prey.bottom - actor.bottom() > JUMP_TRIGGER_MARGIN;
        let in_range = (prey.center.x - actor.pos.x).abs() <= AGGRO_RADIUS;
        if prey_above && in_range && can_jump {
            actor.vel.y = jump_speed;
            actor.grounded = false;
        }
    }

    if prey.center.x < actor.pos.x {
        actor.direction = Direction::Left;
    } else if prey.center.x > actor.pos.x {
        actor.direction = Direction::Right;
    }
}

/// Count one frame of life; every `ENEMY_UPGRADE_INTERVAL` frames scale
/// health and damage by `ENEMY_GROWTH_FACTOR`
///
/// Health is scaled as-is, so a wounded monster heals proportionally.
/// Returns true when an upgrade happened this frame.
pub fn grow(actor: &mut Actor) -> bool {
    let Behavior::Enemy(enemy) = &mut actor.behavior else {
        return false;
    };
    enemy.frames_alive += 1;
    if enemy.frames_alive % ENEMY_UPGRADE_INTERVAL != 0 {
        return false;
    }
    enemy.upgrades += 1;
    let upgrades = enemy.upgrades;

    actor.health *= ENEMY_GROWTH_FACTOR;
    if let Some(combat) = actor.combat.as_mut() {
        combat.damage *= ENEMY_GROWTH_FACTOR;
    }
    log::debug!(
        "actor {} grew stronger (x{}): health {:.2}",
        actor.id.0,
        upgrades,
        actor.health
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::{ActorId, EnemyKind};

    fn prey_at(x: f32, bottom: f32) -> PreyView {
        PreyView {
            center: Vec2::new(x, bottom + 32.0),
            bottom,
        }
    }

    #[test]
    fn test_accelerates_toward_prey() {
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        steer(&mut orc, &prey_at(100.0, 64.0), true);
        assert!((orc.vel.x + 0.1).abs() < 1e-6);
        assert_eq!(orc.direction, Direction::Left);

        steer(&mut orc, &prey_at(900.0, 64.0), true);
        assert!(orc.vel.x.abs() < 1e-6);
        assert_eq!(orc.direction, Direction::Right);
    }

    #[test]
    fn test_speed_is_capped() {
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        for _ in 0..200 {
            steer(&mut orc, &prey_at(900.0, 64.0), true);
        }
        let cap = EnemyKind::Orc.params().max_speed;
        assert!(orc.vel.x <= cap + EnemyKind::Orc.params().acceleration + 1e-3);
        assert!(orc.vel.x >= cap - 1e-3);
    }

    #[test]
    fn test_knocked_back_recovers_gradually() {
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        orc.vel.x = -8.0;
        steer(&mut orc, &prey_at(900.0, 64.0), true);
        assert!((orc.vel.x + 7.9).abs() < 1e-5);
    }

    #[test]
    fn test_jumps_only_when_prey_above_and_close() {
        let jump = EnemyKind::Orc.params().jump_speed;

        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        orc.grounded = true;
        steer(&mut orc, &prey_at(550.0, 192.0), true);
        assert_eq!(orc.vel.y, jump);
        assert!(!orc.grounded);

        // Out of aggro radius
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        steer(&mut orc, &prey_at(700.0, 192.0), true);
        assert_eq!(orc.vel.y, 0.0);

        // Not grounded
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        steer(&mut orc, &prey_at(550.0, 192.0), false);
        assert_eq!(orc.vel.y, 0.0);

        // Prey only slightly higher
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::new(500.0, 96.0), ActorId(1));
        steer(&mut orc, &prey_at(550.0, 64.0 + JUMP_TRIGGER_MARGIN), true);
        assert_eq!(orc.vel.y, 0.0);
    }

    #[test]
    fn test_dragon_chases_vertically() {
        let mut dragon = Actor::enemy(EnemyKind::Dragon, Vec2::new(500.0, 400.0), ActorId(1));
        steer(&mut dragon, &prey_at(500.0, 64.0), false);
        assert!(dragon.vel.y < 0.0);
        assert_eq!(dragon.vel.x, 0.0);
    }

    #[test]
    fn test_growth_every_interval() {
        let mut orc = Actor::enemy(EnemyKind::Orc, Vec2::ZERO, ActorId(1));
        orc.health = 5.0;
        for _ in 0..ENEMY_UPGRADE_INTERVAL - 1 {
            assert!(!grow(&mut orc));
        }
        assert!(grow(&mut orc));
        // Current health is scaled, healing a wounded monster proportionally
        assert!((orc.health - 5.5).abs() < 1e-5);
        assert!((orc.combat.unwrap().damage - 4.4).abs() < 1e-5);
    }
}
