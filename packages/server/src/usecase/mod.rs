//! UseCase layer: one use case per inbound event, driven by the broadcast coordinator.

pub mod connect_participant;
pub mod coordinator;
pub mod disconnect_participant;
pub mod error;
pub mod register_participant;
pub mod send_message;
pub mod update_state;

use crate::domain::ConnectionId;

pub use connect_participant::ConnectParticipantUseCase;
pub use coordinator::{BroadcastCoordinator, CoordinatorHandle, InboundEvent};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, CoordinatorError, DisconnectError, RegisterError, SendMessageError,
    UpdateStateError,
};
pub use register_participant::RegisterParticipantUseCase;
pub use send_message::SendMessageUseCase;
pub use update_state::UpdateStateUseCase;

/// What a use case fanned out, and to whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<T> {
    pub payload: T,
    pub audience: Vec<ConnectionId>,
}
