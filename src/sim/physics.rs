//! Platformer physics step
//!
//! Gravity integration plus axis-separated collision resolution against a
//! static wall set. The vertical axis is moved and resolved first, then the
//! horizontal axis, so landings stay stable when a move clips a corner.

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::rect::{WallSet, WallSetId};
use crate::settings::WorldSettings;

/// Association between an actor and the walls it collides with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBinding {
    pub wall_set: WallSetId,
    /// Downward acceleration per frame (0 for flyers)
    pub gravity: f32,
}

/// Which surfaces the actor ended the step against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Landed on top of a wall
    pub grounded: bool,
    /// Bumped a wall from below
    pub ceiling: bool,
    /// Pushed flush against a wall side
    pub side: bool,
}

/// Advance `actor` by one frame against `walls`
///
/// Actors without a physics binding are left untouched.
pub fn step(actor: &mut Actor, walls: &WallSet, world: &WorldSettings) -> Contact {
    let mut contact = Contact::default();
    let Some(binding) = actor.physics else {
        return contact;
    };

    actor.vel.y -= binding.gravity;

    // Vertical
    actor.pos.y += actor.vel.y;
    if actor.vel.y != 0.0 {
        let bounds = actor.bounds();
        if actor.vel.y < 0.0 {
            let floor = walls.hits(&bounds).map(|w| w.top()).fold(f32::NEG_INFINITY, f32::max);
            if floor.is_finite() {
                actor.pos.y = floor + bounds.half.y;
                actor.vel.y = 0.0;
                contact.grounded = true;
            }
        } else {
            let ceiling = walls.hits(&bounds).map(|w| w.bottom()).fold(f32::INFINITY, f32::min);
            if ceiling.is_finite() {
                actor.pos.y = ceiling - bounds.half.y;
                actor.vel.y = 0.0;
                contact.ceiling = true;
            }
        }
    }

    // Horizontal
    actor.pos.x += actor.vel.x;
    if actor.vel.x != 0.0 {
        let bounds = actor.bounds();
        if actor.vel.x > 0.0 {
            let wall = walls.hits(&bounds).map(|w| w.left()).fold(f32::INFINITY, f32::min);
            if wall.is_finite() {
                actor.pos.x = wall - bounds.half.x;
                actor.vel.x = 0.0;
                contact.side = true;
            }
        } else {
            let wall = walls.hits(&bounds).map(|w| w.right()).fold(f32::NEG_INFINITY, f32::max);
            if wall.is_finite() {
                actor.pos.x = wall + bounds.half.x;
                actor.vel.x = 0.0;
                contact.side = true;
            }
        }
    }

    actor.grounded = contact.grounded;
    clamp_to_world(actor, world);

    log::trace!(
        "actor {} at ({:.2}, {:.2}) vel ({:.2}, {:.2}) {:?}",
        actor.id.0,
        actor.pos.x,
        actor.pos.y,
        actor.vel.x,
        actor.vel.y,
        contact
    );

    contact
}

/// True when the last physics step left the actor resting on a wall
pub fn can_jump(actor: &Actor) -> bool {
    actor.physics.is_some() && actor.grounded
}

/// Keep the actor inside the horizontal world limits
///
/// An actor past a limit is moved flush with it. Once touching a limit, any
/// velocity pointing further outward is zeroed.
pub fn clamp_to_world(actor: &mut Actor, world: &WorldSettings) {
    let half = actor.size.x * 0.5;
    if actor.left() <= world.left_limit {
        actor.pos.x = actor.pos.x.max(world.left_limit + half);
        if actor.vel.x < 0.0 {
            actor.vel.x = 0.0;
        }
    }
    if actor.right() >= world.right_limit {
        actor.pos.x = actor.pos.x.min(world.right_limit - half);
        if actor.vel.x > 0.0 {
            actor.vel.x = 0.0;
        }
    }
}
