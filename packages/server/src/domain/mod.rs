//! Domain layer: shared state, participants, and the outbound seam.

pub mod entity;
pub mod event;
pub mod message_pusher;
pub mod registry;
pub mod relay;
pub mod session;
pub mod store;
pub mod value_object;

pub use entity::{ChatMessage, Participant, SharedState, StateUpdate};
pub use event::OutboundEvent;
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use relay::MessageRelay;
pub use session::{Audience, Session};
pub use store::SharedStateStore;
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DisplayName, Key, Section, Tempo, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
