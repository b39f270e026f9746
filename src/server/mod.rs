//! Server layer: application state, routing, flood protection and the game session.

pub mod anti_spam;
pub mod game_session;
pub mod router;
pub mod state;
pub mod ws_actor_utils;
pub mod ws_error;
