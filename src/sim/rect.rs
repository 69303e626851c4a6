//! Axis-aligned rectangles and static wall geometry
//!
//! World coordinates are y-up: `bottom < top`. Rectangles are stored by
//! center and half extents so actors and walls share one representation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Copy of this box moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
            half: self.half,
        }
    }

    /// True when the boxes interpenetrate by more than `CONTACT_EPSILON` on
    /// both axes. Boxes that merely touch do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let dx = (self.half.x + other.half.x) - (self.center.x - other.center.x).abs();
        let dy = (self.half.y + other.half.y) - (self.center.y - other.center.y).abs();
        dx > CONTACT_EPSILON && dy > CONTACT_EPSILON
    }
}

/// Immutable square collision tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    bounds: Aabb,
}

impl Wall {
    /// Wall centered at `center` with edge length `tile_size`
    pub fn new(center: Vec2, tile_size: f32) -> Self {
        Self {
            bounds: Aabb::new(center, Vec2::splat(tile_size)),
        }
    }

    /// Wall placed on the tile grid (`col`, `row` in tile units, may be fractional)
    pub fn at_grid(col: f32, row: f32, tile_size: f32) -> Self {
        Self::new(Vec2::new(col, row) * tile_size, tile_size)
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

/// Handle of a wall set inside the session's wall index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSetId(pub usize);

/// A collection of walls consulted read-only by physics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallSet {
    walls: Vec<Wall>,
}

impl WallSet {
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    /// The default arena: an 18-tile floor and two floating ledges
    pub fn arena(tile_size: f32) -> Self {
        let mut walls: Vec<Wall> = (0..18)
            .map(|i| Wall::at_grid(i as f32, 0.5, tile_size))
            .collect();
        for col in 4..7 {
            walls.push(Wall::at_grid(col as f32, 3.5, tile_size));
        }
        for col in 10..13 {
            walls.push(Wall::at_grid(col as f32, 4.5, tile_size));
        }
        Self { walls }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter()
    }

    /// Walls overlapping `rect`
    pub fn hits<'a>(&'a self, rect: &'a Aabb) -> impl Iterator<Item = &'a Aabb> + 'a {
        self.walls
            .iter()
            .map(Wall::bounds)
            .filter(move |w| rect.overlaps(w))
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}
