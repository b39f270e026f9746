use serde::{Deserialize, Serialize};

use crate::game::entities::UnitKind;
use crate::game::types::TerrainKind;

/// Terrain as a given viewer perceives it. `Unknown` is fog, never a real kind.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerrainView {
    Plain,
    Forest,
    Hill,
    Swamp,
    Unknown,
}

impl From<TerrainKind> for TerrainView {
    fn from(kind: TerrainKind) -> Self {
        match kind {
            TerrainKind::Plain => TerrainView::Plain,
            TerrainKind::Forest => TerrainView::Forest,
            TerrainKind::Hill => TerrainView::Hill,
            TerrainKind::Swamp => TerrainView::Swamp,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Owner role, 1 or 2.
    pub owner: u8,
    pub hp: u32,
    pub stun_turns_remaining: u32,
    pub x: i32,
    pub y: i32,
}

/// Per-viewer snapshot of a match.
///
/// `winner` is 1 or 2 once decided; 0 means undecided, or a draw when `game_over` is set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub width: i32,
    pub height: i32,
    pub player1_name: String,
    pub player2_name: String,
    pub current_player: u8,
    /// Indexed `[y][x]`.
    pub terrain: Vec<Vec<TerrainView>>,
    /// Indexed `[y][x]`. Traps are never disclosed, so every entry is `false`.
    pub traps: Vec<Vec<bool>>,
    pub units: Vec<UnitDto>,
    pub game_over: bool,
    pub winner: u8,
}
