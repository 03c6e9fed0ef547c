//! Entities
//!
//! 共有状態（SharedState）、参加者（Participant）、チャットメッセージ（ChatMessage）と、
//! 共有状態への部分更新（StateUpdate）を定義する。

use super::value_object::{ConnectionId, DisplayName, Key, Section, Tempo, Timestamp};

/// セッション全体で共有される楽曲パラメータ
///
/// プロセス内に論理的に 1 つだけ存在し、全クライアントのローカルコピーはこれに収束する。
/// `updated_by` は更新時点の表示名のスナップショットで、参加者への参照ではない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedState {
    pub tempo: Tempo,
    pub key: Key,
    pub section: Section,
    pub notes: String,
    pub last_update: Option<Timestamp>,
    pub updated_by: Option<DisplayName>,
}

impl SharedState {
    /// 部分更新をマージする（last-writer-wins）
    ///
    /// `update` に含まれるフィールドだけを上書きし、それ以外はそのまま残す。
    /// `last_update` と `updated_by` は `update` が空でも必ず上書きされる。
    pub fn merge(&mut self, update: StateUpdate, updated_by: DisplayName, at: Timestamp) {
        let StateUpdate {
            tempo,
            key,
            section,
            notes,
        } = update;

        if let Some(tempo) = tempo {
            self.tempo = tempo;
        }
        if let Some(key) = key {
            self.key = key;
        }
        if let Some(section) = section {
            self.section = section;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        self.last_update = Some(at);
        self.updated_by = Some(updated_by);
    }
}

/// SharedState への部分更新
///
/// `None` のフィールドは「更新しない」を意味する（暗黙のリセットはない）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateUpdate {
    pub tempo: Option<Tempo>,
    pub key: Option<Key>,
    pub section: Option<Section>,
    pub notes: Option<String>,
}

impl StateUpdate {
    pub fn is_empty(&self) -> bool {
        self.tempo.is_none() && self.key.is_none() && self.section.is_none() && self.notes.is_none()
    }
}

/// 登録済みの接続（参加者）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}

/// チャットメッセージ
///
/// 作成後は不変。サーバー側には保存されず、ファンアウトの瞬間にだけ存在する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: DisplayName,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(from: DisplayName, text: String, timestamp: Timestamp) -> Self {
        Self {
            from,
            text,
            timestamp,
        }
    }
}
