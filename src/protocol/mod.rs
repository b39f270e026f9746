//! Wire protocol between the session server and remote clients.
//!
//! Every WebSocket frame is a JSON envelope `{"type": "...", "payload": {...}}`.
//! Pure data: no socket or session logic lives here.

pub mod dto;
pub mod messages;


pub use dto::*;
pub use messages::*;
