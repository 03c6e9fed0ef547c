//! Outbound events
//!
//! サーバーからクライアントへ送るイベント（ドメイン表現）。ワイヤ形式への変換は Infrastructure 層が行う。

use super::entity::{ChatMessage, Participant, SharedState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// 接続直後に新しい接続だけへ送る現在の共有状態
    InitialState(SharedState),
    /// 参加者一覧
    MusiciansList(Vec<Participant>),
    /// 他の参加者による更新後の共有状態
    StateUpdated(SharedState),
    /// チャットメッセージ
    NewMessage(ChatMessage),
}

impl OutboundEvent {
    /// イベント名（ログ用）
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::InitialState(_) => "initial-state",
            OutboundEvent::MusiciansList(_) => "musicians-list",
            OutboundEvent::StateUpdated(_) => "state-updated",
            OutboundEvent::NewMessage(_) => "new-message",
        }
    }
}
