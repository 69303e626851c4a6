//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by actor ID)
//! - No rendering or platform dependencies

pub mod actor;
pub mod ai;
pub mod combat;
pub mod input;
pub mod physics;
pub mod rect;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorId, Appearance, Behavior, Direction, EnemyKind, Walking, Weapon};
pub use input::{Key, MouseButton};
pub use physics::{Contact, PhysicsBinding};
pub use rect::{Aabb, Wall, WallSet, WallSetId};
pub use registry::{Registry, Sweep};
pub use spawner::Spawner;
pub use state::{ActorView, GamePhase, GameState, Snapshot, Upgrade, UpgradeError};
pub use tick::{FrameReport, tick};
