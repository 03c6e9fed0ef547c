//! Connection Registry
//!
//! 接続ごとの参加者（表示名と参加時刻）を管理する。キーは接続 ID で、表示名の重複は許容する。

use std::collections::HashMap;

use super::{
    entity::Participant,
    value_object::{ConnectionId, DisplayName, Timestamp},
};

/// 接続 ID をキーとした参加者の台帳
///
/// 1 つの接続につき参加者は高々 1 人。登録イベントをまだ送っていない接続はここには現れない。
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    participants: HashMap<ConnectionId, Participant>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 参加者を登録する（同じ接続で再登録した場合は置き換え）
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        joined_at: Timestamp,
    ) {
        self.participants.insert(
            connection_id,
            Participant::new(connection_id, display_name, joined_at),
        );
    }

    /// 参加者を削除して返す。未登録の接続なら `None`
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        self.participants.remove(connection_id)
    }

    /// 参加者一覧のスナップショット
    ///
    /// 参加時刻、接続 ID の順でソートする。
    pub fn list(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.connection_id.cmp(&b.connection_id))
        });
        participants
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants.get(connection_id)
    }

    /// イベントの帰属先となる表示名。未登録なら `unknown` 番兵を返す
    pub fn display_name_of(&self, connection_id: &ConnectionId) -> DisplayName {
        self.lookup(connection_id)
            .map(|participant| participant.display_name.clone())
            .unwrap_or_else(DisplayName::unknown)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
