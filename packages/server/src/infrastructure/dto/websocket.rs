//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame of the form `{"type": "<event-name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Events sent by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    RegisterMusician(String),
    /// `data` が null または無い場合は空の更新として扱う
    UpdateState(Option<StateUpdateDto>),
    SendMessage(String),
}

/// Events sent by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    InitialState(SharedStateDto),
    MusiciansList(Vec<MusicianDto>),
    StateUpdated(SharedStateDto),
    NewMessage(ChatMessageDto),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedStateDto {
    pub tempo: i64,
    pub tonalite: String,
    pub structure: String,
    pub notes: String,
    /// RFC 3339
    pub last_update: Option<String>,
    pub updated_by: Option<String>,
}

/// Partial update payload of `update-state`
///
/// Missing keys mean "leave unchanged"; unrecognized keys are ignored.
/// `key` / `section` are accepted as English spellings of `tonalite` / `structure`;
/// when both spellings are present the French one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateUpdateDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonalite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MusicianDto {
    pub id: String,
    pub name: String,
    /// RFC 3339
    pub connected_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessageDto {
    pub from: String,
    pub text: String,
    /// RFC 3339
    pub timestamp: String,
}
