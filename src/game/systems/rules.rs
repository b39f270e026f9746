//! Terrain side-effects applied to a unit at the end of a move.

use crate::config::game::{TRAP_DAMAGE, TRAP_STUN_TURNS};
use crate::game::entities::Unit;
use crate::game::grid::TerrainGrid;
use crate::game::types::TerrainKind;

/// What happened to a unit when it entered its destination cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellEffects {
    /// Stun applied by a swamp, if the destination was one.
    pub swamp_stun: Option<u32>,
    /// Whether a hidden trap was sprung (and cleared).
    pub trap_sprung: bool,
}

/// Apply swamp and trap effects of the cell `unit` now stands on. Both may fire on the same move.
pub fn apply_cell_effects(grid: &mut TerrainGrid, unit: &mut Unit) -> CellEffects {
    let pos = unit.position();
    let mut effects = CellEffects::default();

    if grid.terrain_at(pos) == TerrainKind::Swamp {
        let turns = unit.kind().swamp_stun_turns();
        unit.stun_for_turns(turns);
        effects.swamp_stun = Some(turns);
    }

    if grid.trigger_trap_at(pos) {
        unit.damage(TRAP_DAMAGE);
        unit.stun_for_turns(TRAP_STUN_TURNS);
        effects.trap_sprung = true;
    }

    effects
}
