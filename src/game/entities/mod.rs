//! Game entities module.
//!
//! This module organizes unit and player entity logic.

pub mod player;
pub mod unit;

pub use player::*;
pub use unit::*;
