//! Stagesync sync server library.
//!
//! Keeps every connected musician's view of the shared song state (tempo, key,
//! section, notes) in sync over WebSocket, and relays chat messages between them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
