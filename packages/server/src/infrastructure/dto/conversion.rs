//! Conversion logic between DTOs and domain entities.

use stagesync_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    entity::{ChatMessage, Participant, SharedState, StateUpdate},
    event::OutboundEvent,
    value_object::{Key, Section, Tempo},
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::StateUpdateDto> for StateUpdate {
    fn from(dto: dto::StateUpdateDto) -> Self {
        Self {
            tempo: dto.tempo.map(Tempo::new),
            key: dto.tonalite.or(dto.key).map(Key::from),
            section: dto.structure.or(dto.section).map(Section::from),
            notes: dto.notes,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<SharedState> for dto::SharedStateDto {
    fn from(model: SharedState) -> Self {
        Self {
            tempo: model.tempo.bpm(),
            tonalite: model.key.as_str().to_string(),
            structure: model.section.as_str().to_string(),
            notes: model.notes,
            last_update: model.last_update.map(|at| timestamp_to_rfc3339(at.value())),
            updated_by: model.updated_by.map(|name| name.into_string()),
        }
    }
}

impl From<Participant> for dto::MusicianDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.connection_id.to_string(),
            name: model.display_name.into_string(),
            connected_at: timestamp_to_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<ChatMessage> for dto::ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            from: model.from.into_string(),
            text: model.text,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<&OutboundEvent> for dto::ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event.clone() {
            OutboundEvent::InitialState(state) => dto::ServerEvent::InitialState(state.into()),
            OutboundEvent::MusiciansList(participants) => dto::ServerEvent::MusiciansList(
                participants.into_iter().map(Into::into).collect(),
            ),
            OutboundEvent::StateUpdated(state) => dto::ServerEvent::StateUpdated(state.into()),
            OutboundEvent::NewMessage(message) => dto::ServerEvent::NewMessage(message.into()),
        }
    }
}
