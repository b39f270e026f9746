//! Fog of war.
//!
//! A side sees every in-bounds cell within the vision range (Manhattan) of one of
//! its living units, including the cells the units stand on. Nothing is cached:
//! visibility is a pure function of where the units are right now.

use std::collections::HashSet;

use crate::game::grid::TerrainGrid;
use crate::game::state::Game;
use crate::game::types::{Position, Role};

/// Cells currently observable by `role`.
pub fn visibility_for(game: &Game, role: Role) -> HashSet<Position> {
    let grid = game.grid();
    let mut visible = HashSet::new();
    for unit in game.units_of(role).filter(|u| u.is_alive()) {
        reveal_around(grid, unit.position(), unit.stats().vision_range, &mut visible);
    }
    visible
}

fn reveal_around(grid: &TerrainGrid, center: Position, range: u32, visible: &mut HashSet<Position>) {
    let r = range as i32;
    for dy in -r..=r {
        let span = r - dy.abs();
        for dx in -span..=span {
            let pos = Position::new(center.x + dx, center.y + dy);
            if grid.is_inside(pos) {
                visible.insert(pos);
            }
        }
    }
}
