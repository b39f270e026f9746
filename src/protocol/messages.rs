use serde::{Deserialize, Serialize};

use super::dto::GameStateDto;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Move,
    Attack,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub player_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(alias = "action")]
    pub kind: ActionKind,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

// Client -> server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "UPPERCASE")]
pub enum ClientMessage {
    Join(JoinRequest),
    Action(ActionRequest),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TextPayload {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RolePayload {
    pub role: u8,
}

// Server -> client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "UPPERCASE")]
pub enum ServerMessage {
    State(GameStateDto),
    Error(TextPayload),
    Info(TextPayload),
    Role(RolePayload),
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(TextPayload { message: message.into() })
    }
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(TextPayload { message: message.into() })
    }
    pub fn role(role: u8) -> Self {
        Self::Role(RolePayload { role })
    }
    pub fn state(state: GameStateDto) -> Self {
        Self::State(state)
    }
}
