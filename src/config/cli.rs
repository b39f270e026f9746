//! Command-line configuration for the server binary.

use clap::Parser;

use crate::config::game::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, MAX_GRID_SIDE, MIN_GRID_SIDE};
use crate::config::server::{DEFAULT_HOST, DEFAULT_PORT};

/// Runtime options, parsed once at start-up.
#[derive(Parser, Debug, Clone)]
#[command(name = "kriegspiel", version, about = "Authoritative two-player Kriegspiel server")]
pub struct ServerArgs {
    /// Address to bind the HTTP/WebSocket listener to.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Grid width in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH,
          value_parser = clap::value_parser!(i32).range(MIN_GRID_SIDE as i64..=MAX_GRID_SIDE as i64))]
    pub width: i32,

    /// Grid height in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT,
          value_parser = clap::value_parser!(i32).range(MIN_GRID_SIDE as i64..=MAX_GRID_SIDE as i64))]
    pub height: i32,

    /// Seed for the map generator, for reproducible match sequences. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}
