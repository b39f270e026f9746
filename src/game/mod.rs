//! Rules engine: units, players, the terrain grid, fog of war and the turn engine.
//!
//! Nothing in here knows about sockets. The session layer drives a [`state::Game`]
//! and redacts it per viewer using [`systems::visibility_for`].

pub mod error;
pub mod state;
pub mod types;

pub mod entities;
pub mod grid;
pub mod systems;


pub use error::GameError;
pub use state::Game;
pub use types::*;
