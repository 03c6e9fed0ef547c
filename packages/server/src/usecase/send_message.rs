//! UseCase: チャットメッセージ送信（send-message）
//!
//! ### 何をしているか
//! - 送信者の表示名（未登録なら `unknown`）と時刻を付けてメッセージを作る
//! - 送信者を含む全ての接続にブロードキャストする
//!
//! メッセージは保存しない。後から参加した接続に過去のメッセージは届かない。

use std::sync::Arc;

use stagesync_shared::time::Clock;

use crate::domain::{
    Audience, ChatMessage, ConnectionId, MessagePusher, OutboundEvent, Session, Timestamp,
};

use super::{Delivery, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery)` - 中継したメッセージと送信先（送信者を含む）
    /// * `Err(SendMessageError)` - 入力が捨てられた
    pub fn execute(
        &self,
        session: &Session,
        pusher: &dyn MessagePusher,
        connection_id: ConnectionId,
        text: &str,
    ) -> Result<Delivery<ChatMessage>, SendMessageError> {
        if text.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }
        if !session.is_open(&connection_id) {
            return Err(SendMessageError::ConnectionClosed(connection_id));
        }

        let at = Timestamp::new(self.clock.now_millis());
        let message = session.relay(&connection_id, text.to_string(), at);

        let audience = session.audience(Audience::Everyone);
        if let Err(e) = pusher.broadcast(&audience, &OutboundEvent::NewMessage(message.clone())) {
            tracing::warn!("Failed to broadcast new-message: {}", e);
        }

        Ok(Delivery {
            payload: message,
            audience,
        })
    }
}
