//! Terrain grid: cells, occupancy and map generation.

#[allow(clippy::module_inception)]
mod grid;

pub use grid::*;
