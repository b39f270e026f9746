/// Main configuration module.
///
/// Re-exports submodules for game, server and anti-spam configuration,
/// and the command-line arguments of the server binary.
pub mod anti_spam;
pub mod cli;
pub mod game;
pub mod server;
