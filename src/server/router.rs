//! HTTP and WebSocket routing configuration.

use actix_web::web;
use crate::server::game_session::session::ws_game;

/// The game is played over a single WebSocket endpoint.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_game));
}
