//! Session 集約
//!
//! 生きている接続の集合、Connection Registry、Shared State Store をまとめて所有する。
//! この集約を所有するのは Broadcast Coordinator のイベントループだけで、
//! 全ての変更はそのループ上で 1 イベントずつ行われる。

use std::collections::BTreeSet;

use super::{
    entity::{ChatMessage, Participant, SharedState, StateUpdate},
    registry::ConnectionRegistry,
    relay::MessageRelay,
    store::SharedStateStore,
    value_object::{ConnectionId, DisplayName, Timestamp},
};

/// 送信先の集合（ブロードキャストの宛先）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// 指定した接続だけ
    Only(ConnectionId),
    /// 全ての接続
    Everyone,
    /// 指定した接続以外の全て
    EveryoneExcept(ConnectionId),
}

#[derive(Debug, Default)]
pub struct Session {
    connections: BTreeSet<ConnectionId>,
    registry: ConnectionRegistry,
    store: SharedStateStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続を開く。既に開いていれば `false`
    pub fn open_connection(&mut self, connection_id: ConnectionId) -> bool {
        self.connections.insert(connection_id)
    }

    /// 接続を閉じる。開いていなければ `false`
    pub fn close_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id)
    }

    pub fn is_open(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        joined_at: Timestamp,
    ) {
        self.registry.register(connection_id, display_name, joined_at);
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        self.registry.remove(connection_id)
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.registry.list()
    }

    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.registry.lookup(connection_id)
    }

    pub fn snapshot(&self) -> SharedState {
        self.store.snapshot()
    }

    pub fn apply_update(
        &mut self,
        connection_id: &ConnectionId,
        update: StateUpdate,
        at: Timestamp,
    ) -> SharedState {
        self.store
            .apply_update(&self.registry, connection_id, update, at)
    }

    pub fn relay(&self, connection_id: &ConnectionId, text: String, at: Timestamp) -> ChatMessage {
        MessageRelay::relay(&self.registry, connection_id, text, at)
    }

    /// 送信先の接続 ID を求める
    ///
    /// 登録の有無は関係なく、開いている接続だけが対象になる。
    pub fn audience(&self, audience: Audience) -> Vec<ConnectionId> {
        match audience {
            Audience::Only(target) => self
                .connections
                .iter()
                .filter(|id| **id == target)
                .copied()
                .collect(),
            Audience::Everyone => self.connections.iter().copied().collect(),
            Audience::EveryoneExcept(excluded) => self
                .connections
                .iter()
                .filter(|id| **id != excluded)
                .copied()
                .collect(),
        }
    }
}
