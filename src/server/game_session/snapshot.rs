//! Per-viewer redaction of the authoritative game state.
//!
//! A viewer sees the terrain of the cells in its visibility set and `UNKNOWN`
//! elsewhere, its own units always, enemy units only inside the visibility set,
//! and never any trap.

use crate::game::entities::Unit;
use crate::game::systems::visibility_for;
use crate::game::{Game, Outcome, Position, Role};
use crate::protocol::{GameStateDto, TerrainView, UnitDto};

/// Build the `STATE` payload `viewer` is entitled to see.
pub fn snapshot_for(game: &Game, viewer: Role) -> GameStateDto {
    let grid = game.grid();
    let visible = visibility_for(game, viewer);
    let (width, height) = (grid.width(), grid.height());

    let terrain = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let pos = Position::new(x, y);
                    if visible.contains(&pos) {
                        grid.terrain_at(pos).into()
                    } else {
                        TerrainView::Unknown
                    }
                })
                .collect()
        })
        .collect();

    let units = grid
        .positions()
        .filter_map(|pos| game.unit_at(pos))
        .filter(|unit| unit.owner() == viewer || visible.contains(&unit.position()))
        .map(unit_dto)
        .collect();

    let winner = match game.outcome() {
        Some(Outcome::Winner(role)) => role.number(),
        Some(Outcome::Draw) | None => 0,
    };

    GameStateDto {
        width,
        height,
        player1_name: game.player(Role::First).name().to_string(),
        player2_name: game.player(Role::Second).name().to_string(),
        current_player: game.current_player().number(),
        terrain,
        traps: vec![vec![false; width as usize]; height as usize],
        units,
        game_over: game.is_game_over(),
        winner,
    }
}

fn unit_dto(unit: &Unit) -> UnitDto {
    let pos = unit.position();
    UnitDto {
        kind: unit.kind(),
        owner: unit.owner().number(),
        hp: unit.hp(),
        stun_turns_remaining: unit.skip_turns_remaining(),
        x: pos.x,
        y: pos.y,
    }
}
