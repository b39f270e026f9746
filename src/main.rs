//! Main entry point for the game server.
//!
//! Parses the command line, starts the session actor that owns the lobby and the
//! match, and launches the HTTP server exposing the WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::info;

use config::cli::ServerArgs;
use server::game_session::lobby::Lobby;
use server::game_session::SessionServer;

mod config;
mod game;
mod protocol;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Logger from RUST_LOG, info by default.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = ServerArgs::parse();

    let lobby = Lobby::new(args.width, args.height, args.seed);
    let session_addr = SessionServer::new(lobby).start();
    let state = web::Data::new(server::state::AppState::new(session_addr));

    info!(
        "Starting server on {}:{} ({}x{} map)",
        args.host, args.port, args.width, args.height
    );

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
