//! Application state shared with the HTTP/WebSocket handlers.

use actix::Addr;
use crate::server::game_session::SessionServer;

pub struct AppState {
    /// Address of the actor owning the lobby and the match.
    pub session_addr: Addr<SessionServer>,
}

impl AppState {
    pub fn new(session_addr: Addr<SessionServer>) -> Self {
        AppState { session_addr }
    }
}
