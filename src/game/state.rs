use log::debug;
use rand::Rng;

use crate::game::entities::{Player, Unit, UnitKind};
use crate::game::error::{GameError, Result};
use crate::game::grid::TerrainGrid;
use crate::game::systems::{CellEffects, apply_cell_effects};
use crate::game::types::{Outcome, Position, Role, UnitId};

/// Units each side deploys at the start of a match, mirrored into opposite corners.
pub fn starting_layout(role: Role, width: i32, height: i32) -> [(UnitKind, Position); 4] {
    match role {
        Role::First => [
            (UnitKind::Infantry, Position::new(0, 0)),
            (UnitKind::Infantry, Position::new(1, 0)),
            (UnitKind::Cavalry, Position::new(0, 1)),
            (UnitKind::Artillery, Position::new(1, 1)),
        ],
        Role::Second => {
            let (x, y) = (width - 2, height - 2);
            [
                (UnitKind::Infantry, Position::new(x, y)),
                (UnitKind::Infantry, Position::new(x + 1, y)),
                (UnitKind::Cavalry, Position::new(x + 1, y - 1)),
                (UnitKind::Artillery, Position::new(x, y - 1)),
            ]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    pub effects: CellEffects,
    /// The mover died on a trap and has been taken off the board.
    pub killed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: u32,
    pub target_hp: u32,
    pub killed: bool,
}

/// The turn engine. Owns the map, both sides and every unit.
///
/// One Move or Attack may be committed per turn; the latch is only cleared by
/// [`Game::end_turn`]. The engine never ends the match on its own: callers check
/// [`Game::is_game_over`] after each committed action.
#[derive(Debug, Clone)]
pub struct Game {
    grid: TerrainGrid,
    players: [Player; 2],
    units: Vec<Unit>,
    current: Role,
    action_performed: bool,
    turn: u32,
}

impl Game {
    /// Generates a map and deploys both starting layouts.
    pub fn new<R: Rng>(
        width: i32,
        height: i32,
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        rng: &mut R,
    ) -> Result<Self> {
        let reserved: Vec<Position> = Role::ALL
            .iter()
            .flat_map(|&role| starting_layout(role, width, height).map(|(_, pos)| pos))
            .collect();
        let grid = TerrainGrid::generate(width, height, &reserved, rng);

        let mut game = Self::with_grid(grid, first_name, second_name);
        for role in Role::ALL {
            for (kind, pos) in starting_layout(role, width, height) {
                game.spawn_unit(kind, role, pos)?;
            }
        }
        debug!("[Game] New {}x{} game: {} vs {}", width, height, game.players[0].name(), game.players[1].name());
        Ok(game)
    }

    /// A game on a prepared map with no units deployed yet.
    pub fn with_grid(grid: TerrainGrid, first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        Self {
            grid,
            players: [Player::new(first_name), Player::new(second_name)],
            units: Vec::new(),
            current: Role::First,
            action_performed: false,
            turn: 1,
        }
    }

    pub fn spawn_unit(&mut self, kind: UnitKind, owner: Role, pos: Position) -> Result<UnitId> {
        let id = UnitId(self.units.len());
        let mut unit = Unit::new(id, kind, owner, pos);
        self.grid.place_unit(&mut unit, pos)?;
        self.players[owner.index()].add_unit(id);
        self.units.push(unit);
        Ok(id)
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn player(&self, role: Role) -> &Player {
        &self.players[role.index()]
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.grid.unit_at(pos).and_then(|id| self.unit(id))
    }

    /// Live units of `role`, in roster order.
    pub fn units_of(&self, role: Role) -> impl Iterator<Item = &Unit> {
        self.player(role).units().iter().filter_map(|&id| self.unit(id))
    }

    pub fn current_player(&self) -> Role {
        self.current
    }

    pub fn opponent_player(&self) -> Role {
        self.current.opponent()
    }

    #[cfg(test)]
    pub fn is_action_performed_this_turn(&self) -> bool {
        self.action_performed
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    fn unit_ref(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id).ok_or(GameError::CellOccupiedOrEmptyMismatch)
    }

    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<MoveOutcome> {
        let unit = self.unit_ref(id)?;
        if unit.owner() != self.current {
            return Err(GameError::NotYourUnit);
        }
        if self.action_performed {
            return Err(GameError::ActionAlreadyUsed);
        }
        if !unit.can_act() {
            return Err(GameError::UnitCannotAct);
        }
        if !unit.can_move_to(to, &self.grid) {
            return Err(GameError::IllegalMove);
        }
        let from = unit.position();

        let unit = &mut self.units[id.0];
        self.grid.move_unit(unit, to)?;
        let effects = apply_cell_effects(&mut self.grid, unit);
        let killed = !unit.is_alive();
        if killed {
            self.take_off_board(id)?;
        }
        self.action_performed = true;

        debug!("[Game] {} moved unit {} {} -> {} ({:?})", self.current, id, from, to, effects);
        Ok(MoveOutcome { from, to, effects, killed })
    }

    pub fn attack(&mut self, attacker: UnitId, target: UnitId) -> Result<AttackOutcome> {
        let striker = self.unit_ref(attacker)?;
        let victim = self.unit_ref(target)?;
        if striker.owner() != self.current {
            return Err(GameError::NotYourUnit);
        }
        if self.action_performed {
            return Err(GameError::ActionAlreadyUsed);
        }
        if victim.owner() == self.current {
            return Err(GameError::FriendlyFire);
        }
        if !victim.is_alive() || self.grid.unit_at(victim.position()) != Some(target) {
            return Err(GameError::CellOccupiedOrEmptyMismatch);
        }
        if !striker.can_act() {
            return Err(GameError::UnitCannotAct);
        }
        if !striker.can_attack(victim.position(), &self.grid) {
            return Err(GameError::OutOfRange);
        }

        let striker = striker.clone();
        let victim = &mut self.units[target.0];
        let before = victim.hp();
        striker.attack(victim);
        let target_hp = victim.hp();
        let killed = !victim.is_alive();
        if killed {
            self.take_off_board(target)?;
        }
        self.action_performed = true;

        debug!("[Game] {} unit {} hit {} for {} (hp {})", self.current, attacker, target, before - target_hp, target_hp);
        Ok(AttackOutcome { damage: before - target_hp, target_hp, killed })
    }

    /// Removes a dead unit from its cell and from its owner's roster.
    fn take_off_board(&mut self, id: UnitId) -> Result<()> {
        let unit = &self.units[id.0];
        self.grid.remove_unit(unit)?;
        self.players[unit.owner().index()].remove_unit(id);
        debug!("[Game] Unit {} of {} destroyed", id, unit.owner());
        Ok(())
    }

    /// Hands the turn to the other side and recovers its stunned units by one turn.
    pub fn end_turn(&mut self) {
        self.current = self.current.opponent();
        self.action_performed = false;
        self.turn += 1;
        for &id in self.players[self.current.index()].units() {
            if let Some(unit) = self.units.get_mut(id.0) {
                unit.tick_turn();
            }
        }
        debug!("[Game] Turn {}: {} to act, {} waits", self.turn, self.current, self.opponent_player());
    }

    pub fn is_game_over(&self) -> bool {
        self.players.iter().any(|p| !p.has_units())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match (self.players[0].has_units(), self.players[1].has_units()) {
            (true, true) => None,
            (true, false) => Some(Outcome::Winner(Role::First)),
            (false, true) => Some(Outcome::Winner(Role::Second)),
            (false, false) => Some(Outcome::Draw),
        }
    }
}
