//! UseCase: 参加者登録（register-musician）
//!
//! ### 何をしているか
//! - 受け取った表示名のまま、接続を参加者として登録する（同じ接続なら置き換え）
//! - 更新後の参加者一覧を送信者を含む全ての接続にブロードキャストする
//!
//! ### 捨てられる入力
//! - 空白だけ / 空の表示名
//! - 既に閉じた接続からの登録

use std::sync::Arc;

use stagesync_shared::time::Clock;

use crate::domain::{
    Audience, ConnectionId, DisplayName, MessagePusher, OutboundEvent, Participant, Session,
    Timestamp,
};

use super::{Delivery, error::RegisterError};

/// 参加者登録のユースケース
pub struct RegisterParticipantUseCase {
    clock: Arc<dyn Clock>,
}

impl RegisterParticipantUseCase {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// 参加者登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery)` - ブロードキャストした参加者一覧と送信先
    /// * `Err(RegisterError)` - 入力が捨てられた
    pub fn execute(
        &self,
        session: &mut Session,
        pusher: &dyn MessagePusher,
        connection_id: ConnectionId,
        name: &str,
    ) -> Result<Delivery<Vec<Participant>>, RegisterError> {
        if name.trim().is_empty() {
            return Err(RegisterError::EmptyName);
        }
        if !session.is_open(&connection_id) {
            return Err(RegisterError::ConnectionClosed(connection_id));
        }

        let joined_at = Timestamp::new(self.clock.now_millis());
        session.register(connection_id, DisplayName::new(name), joined_at);

        let participants = session.participants();
        let audience = session.audience(Audience::Everyone);
        let event = OutboundEvent::MusiciansList(participants.clone());
        if let Err(e) = pusher.broadcast(&audience, &event) {
            tracing::warn!("Failed to broadcast musicians-list: {}", e);
        }

        Ok(Delivery {
            payload: participants,
            audience,
        })
    }
}
