/// Game configuration constants.
///
/// This module defines the rules parameters that are not part of a unit's stat line:
/// default and allowed grid dimensions, map generation densities and trap effects.
pub const DEFAULT_GRID_WIDTH: i32 = 12;

/// Number of rows of the default grid.
pub const DEFAULT_GRID_HEIGHT: i32 = 12;

/// Smallest grid side that still fits both starting layouts.
pub const MIN_GRID_SIDE: i32 = 6;

/// Largest grid side accepted from the command line.
pub const MAX_GRID_SIDE: i32 = 64;

/// Chance (in percent) that a generated cell is Forest.
pub const FOREST_PERCENT: u32 = 15;

/// Chance (in percent) that a generated cell is Hill.
pub const HILL_PERCENT: u32 = 10;

/// Chance (in percent) that a generated cell is Swamp.
pub const SWAMP_PERCENT: u32 = 8;

/// One trap is hidden per this many cells of grid area.
pub const CELLS_PER_TRAP: usize = 20;

/// Cells around a starting position that stay Plain and trap-free.
pub const START_ZONE_MARGIN: u32 = 1;

/// Damage dealt by a trap to the unit that springs it.
pub const TRAP_DAMAGE: u32 = 3;

/// Turns a trap stuns the unit that springs it.
pub const TRAP_STUN_TURNS: u32 = 1;
