//! UseCase: 切断処理
//!
//! ### 何をしているか
//! - 接続を閉じ、送信チャンネルを MessagePusher から登録解除する
//! - 参加者として登録されていれば台帳から削除し、残りの全接続に参加者一覧を送る
//!
//! ### 想定している状況
//! - 登録前に切断した接続: 台帳に何もないのでブロードキャストしない
//! - 二重の切断通知: 2 回目は NotConnected で何もしない

use crate::domain::{Audience, ConnectionId, MessagePusher, OutboundEvent, Participant, Session};

use super::{Delivery, error::DisconnectError};

/// 切断処理のユースケース
#[derive(Debug, Default)]
pub struct DisconnectParticipantUseCase;

impl DisconnectParticipantUseCase {
    pub fn new() -> Self {
        Self
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Delivery))` - 参加者を削除し、参加者一覧をブロードキャストした
    /// * `Ok(None)` - 未登録の接続だったのでブロードキャストしていない
    /// * `Err(DisconnectError)` - 接続は既に閉じている
    pub fn execute(
        &self,
        session: &mut Session,
        pusher: &mut dyn MessagePusher,
        connection_id: ConnectionId,
    ) -> Result<Option<Delivery<Vec<Participant>>>, DisconnectError> {
        if !session.close_connection(&connection_id) {
            return Err(DisconnectError::NotConnected(connection_id));
        }
        pusher.unregister_client(&connection_id);

        let Some(removed) = session.remove(&connection_id) else {
            return Ok(None);
        };
        tracing::info!(
            "Musician '{}' ({}) left",
            removed.display_name,
            connection_id
        );

        let participants = session.participants();
        let audience = session.audience(Audience::Everyone);
        let event = OutboundEvent::MusiciansList(participants.clone());
        if let Err(e) = pusher.broadcast(&audience, &event) {
            tracing::warn!("Failed to broadcast musicians-list: {}", e);
        }

        Ok(Some(Delivery {
            payload: participants,
            audience,
        }))
    }
}
