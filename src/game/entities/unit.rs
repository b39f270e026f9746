//! Unit entity logic.
//!
//! A unit is one of three variants sharing a fixed stat record. The variants only
//! differ in their stats and two rules hooks: which terrain they may enter and
//! whether they gain attack range from the terrain they stand on.

use serde::{Deserialize, Serialize};

use crate::game::grid::TerrainGrid;
use crate::game::types::{Position, Role, TerrainKind, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Infantry,
    Cavalry,
    Artillery,
}

/// Fixed stat line of a unit variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub max_hp: u32,
    pub attack: u32,
    pub move_range: u32,
    pub attack_range: u32,
    pub vision_range: u32,
}

impl UnitKind {
    pub const fn stats(self) -> UnitStats {
        match self {
            UnitKind::Infantry => UnitStats { max_hp: 10, attack: 4, move_range: 2, attack_range: 1, vision_range: 3 },
            UnitKind::Cavalry => UnitStats { max_hp: 8, attack: 5, move_range: 4, attack_range: 1, vision_range: 4 },
            UnitKind::Artillery => UnitStats { max_hp: 6, attack: 6, move_range: 1, attack_range: 3, vision_range: 3 },
        }
    }

    pub fn can_enter_terrain(self, terrain: TerrainKind) -> bool {
        match self {
            UnitKind::Infantry => true,
            UnitKind::Cavalry => terrain != TerrainKind::Forest,
            UnitKind::Artillery => terrain != TerrainKind::Swamp,
        }
    }

    /// Extra attack range granted by the terrain the attacker stands on.
    pub fn attack_range_bonus(self, standing_on: TerrainKind) -> u32 {
        match (self, standing_on) {
            (UnitKind::Artillery, TerrainKind::Hill) => 1,
            _ => 0,
        }
    }

    /// Turns lost when the unit ends a move in a swamp.
    pub fn swamp_stun_turns(self) -> u32 {
        match self {
            UnitKind::Cavalry => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    owner: Role,
    hp: u32,
    pos: Position,
    skip_turns_remaining: u32,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, owner: Role, pos: Position) -> Self {
        Self {
            id,
            kind,
            owner,
            hp: kind.stats().max_hp,
            pos,
            skip_turns_remaining: 0,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn owner(&self) -> Role {
        self.owner
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: Position) {
        self.pos = pos;
    }

    pub fn stats(&self) -> UnitStats {
        self.kind.stats()
    }

    pub fn skip_turns_remaining(&self) -> u32 {
        self.skip_turns_remaining
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn can_act(&self) -> bool {
        self.skip_turns_remaining == 0 && self.is_alive()
    }

    pub fn can_enter_terrain(&self, terrain: TerrainKind) -> bool {
        self.kind.can_enter_terrain(terrain)
    }

    pub fn can_move_to(&self, target: Position, grid: &TerrainGrid) -> bool {
        grid.is_inside(target)
            && grid.unit_at(target).is_none()
            && self.can_act()
            && self.pos.distance(target) <= self.stats().move_range
            && self.can_enter_terrain(grid.terrain_at(target))
    }

    /// Attack range including the bonus of the cell the unit currently stands on.
    pub fn effective_attack_range(&self, grid: &TerrainGrid) -> u32 {
        self.stats().attack_range + self.kind.attack_range_bonus(grid.terrain_at(self.pos))
    }

    pub fn can_attack(&self, target: Position, grid: &TerrainGrid) -> bool {
        self.can_act() && self.pos.distance(target) <= self.effective_attack_range(grid)
    }

    /// Deal this unit's attack power to `other`.
    pub fn attack(&self, other: &mut Unit) {
        other.damage(self.stats().attack);
    }

    pub fn damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Stuns never stack; the longer one wins.
    pub fn stun_for_turns(&mut self, turns: u32) {
        self.skip_turns_remaining = self.skip_turns_remaining.max(turns);
    }

    pub fn tick_turn(&mut self) {
        self.skip_turns_remaining = self.skip_turns_remaining.saturating_sub(1);
    }
}
