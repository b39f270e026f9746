//! Game session layer: the lobby state machine, the actor that owns it and the
//! per-socket connection actors.

pub mod lobby;
pub mod messages;
pub mod server;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use server::SessionServer;
