//! UseCase 層のエラー型
//!
//! いずれも「入力を黙って捨てる」ケースを表す。コーディネーターはログに残すだけで、
//! クライアントにエラーを返すことはない。

use thiserror::Error;

use crate::domain::ConnectionId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection '{0}' is already open")]
    AlreadyConnected(ConnectionId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("Display name is empty")]
    EmptyName,

    #[error("Connection '{0}' is not open")]
    ConnectionClosed(ConnectionId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateStateError {
    #[error("Connection '{0}' is not open")]
    ConnectionClosed(ConnectionId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("Message text is empty")]
    EmptyMessage,

    #[error("Connection '{0}' is not open")]
    ConnectionClosed(ConnectionId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("Connection '{0}' is not open")]
    NotConnected(ConnectionId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Broadcast coordinator has stopped")]
    Stopped,
}
