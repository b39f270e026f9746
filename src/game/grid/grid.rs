use rand::Rng;
use rand::seq::IteratorRandom;

use crate::config::game::{
    CELLS_PER_TRAP, FOREST_PERCENT, HILL_PERCENT, START_ZONE_MARGIN, SWAMP_PERCENT,
};
use crate::game::entities::Unit;
use crate::game::error::{GameError, Result};
use crate::game::types::{Position, TerrainKind, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub terrain: TerrainKind,
    pub trap: bool,
    pub occupant: Option<UnitId>,
}

/// Fixed-size map. Terrain never changes after construction; only traps are
/// cleared and occupants come and go.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl TerrainGrid {
    /// A grid with the same terrain everywhere and no traps.
    pub fn filled(width: i32, height: i32, terrain: TerrainKind) -> Self {
        let area = (width.max(0) * height.max(0)) as usize;
        Self {
            width: width.max(0),
            height: height.max(0),
            cells: vec![Cell { terrain, ..Cell::default() }; area],
        }
    }

    /// Procedural map. Cells within `START_ZONE_MARGIN` of any `reserved`
    /// position stay Plain and trap-free so both sides can deploy and move out.
    pub fn generate<R: Rng>(
        width: i32,
        height: i32,
        reserved: &[Position],
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::filled(width, height, TerrainKind::Plain);
        let in_start_zone = |pos: Position| {
            reserved.iter().any(|r| {
                r.x.abs_diff(pos.x) <= START_ZONE_MARGIN && r.y.abs_diff(pos.y) <= START_ZONE_MARGIN
            })
        };

        let open: Vec<Position> = grid.positions().filter(|&p| !in_start_zone(p)).collect();
        for &pos in &open {
            let roll = rng.random_range(0..100);
            let terrain = if roll < FOREST_PERCENT {
                TerrainKind::Forest
            } else if roll < FOREST_PERCENT + HILL_PERCENT {
                TerrainKind::Hill
            } else if roll < FOREST_PERCENT + HILL_PERCENT + SWAMP_PERCENT {
                TerrainKind::Swamp
            } else {
                TerrainKind::Plain
            };
            if let Some(cell) = grid.cell_mut(pos) {
                cell.terrain = terrain;
            }
        }

        let trap_count = grid.cells.len() / CELLS_PER_TRAP;
        for pos in open.into_iter().choose_multiple(rng, trap_count) {
            if let Some(cell) = grid.cell_mut(pos) {
                cell.trap = true;
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_inside(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Every in-bounds position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.is_inside(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        let i = self.index(pos)?;
        self.cells.get(i)
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        self.cells.get_mut(i)
    }

    /// Terrain at `pos`; Plain outside the map.
    pub fn terrain_at(&self, pos: Position) -> TerrainKind {
        self.cell(pos).map(|c| c.terrain).unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn set_terrain(&mut self, pos: Position, terrain: TerrainKind) -> Result<()> {
        let cell = self.cell_mut(pos).ok_or(GameError::InvalidCoordinate)?;
        cell.terrain = terrain;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn has_trap_at(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.trap)
    }

    #[cfg(test)]
    pub(crate) fn set_trap(&mut self, pos: Position) -> Result<()> {
        let cell = self.cell_mut(pos).ok_or(GameError::InvalidCoordinate)?;
        cell.trap = true;
        Ok(())
    }

    /// Clears the trap at `pos`. Returns whether there was one to spring.
    pub fn trigger_trap_at(&mut self, pos: Position) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => std::mem::take(&mut cell.trap),
            None => false,
        }
    }

    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.cell(pos).and_then(|c| c.occupant)
    }

    pub fn place_unit(&mut self, unit: &mut Unit, pos: Position) -> Result<()> {
        let cell = self.cell_mut(pos).ok_or(GameError::InvalidCoordinate)?;
        if cell.occupant.is_some() {
            return Err(GameError::CellOccupiedOrEmptyMismatch);
        }
        cell.occupant = Some(unit.id());
        unit.set_position(pos);
        Ok(())
    }

    /// Relocates `unit`, updating the vacated cell, the target cell and the
    /// unit's own position together.
    pub fn move_unit(&mut self, unit: &mut Unit, to: Position) -> Result<()> {
        let from = self.index(unit.position()).ok_or(GameError::InvalidCoordinate)?;
        let dest = self.index(to).ok_or(GameError::InvalidCoordinate)?;
        if self.cells[from].occupant != Some(unit.id()) {
            return Err(GameError::CellOccupiedOrEmptyMismatch);
        }
        if from == dest {
            return Ok(());
        }
        if self.cells[dest].occupant.is_some() {
            return Err(GameError::CellOccupiedOrEmptyMismatch);
        }
        self.cells[from].occupant = None;
        self.cells[dest].occupant = Some(unit.id());
        unit.set_position(to);
        Ok(())
    }

    pub fn remove_unit(&mut self, unit: &Unit) -> Result<()> {
        let cell = self.cell_mut(unit.position()).ok_or(GameError::InvalidCoordinate)?;
        if cell.occupant != Some(unit.id()) {
            return Err(GameError::CellOccupiedOrEmptyMismatch);
        }
        cell.occupant = None;
        Ok(())
    }
}
