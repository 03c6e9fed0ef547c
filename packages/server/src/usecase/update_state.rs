//! UseCase: 共有状態の更新（update-state）
//!
//! ### 何をしているか
//! - 部分更新を last-writer-wins で共有状態にマージし、更新者と時刻を記録する
//! - マージ後の全状態を送信者以外の全ての接続にブロードキャストする
//!   （送信者は楽観的に更新したローカルコピーを既に持っている）
//!
//! 登録前の接続からの更新も処理する（更新者は `unknown` になる）。値の検証はしない。

use std::sync::Arc;

use stagesync_shared::time::Clock;

use crate::domain::{
    Audience, ConnectionId, MessagePusher, OutboundEvent, Session, SharedState, StateUpdate,
    Timestamp,
};

use super::{Delivery, error::UpdateStateError};

/// 共有状態更新のユースケース
pub struct UpdateStateUseCase {
    clock: Arc<dyn Clock>,
}

impl UpdateStateUseCase {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// 共有状態の更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery)` - マージ後の共有状態と送信先（送信者を除く）
    /// * `Err(UpdateStateError)` - 送信元の接続が既に閉じている
    pub fn execute(
        &self,
        session: &mut Session,
        pusher: &dyn MessagePusher,
        connection_id: ConnectionId,
        update: StateUpdate,
    ) -> Result<Delivery<SharedState>, UpdateStateError> {
        if !session.is_open(&connection_id) {
            return Err(UpdateStateError::ConnectionClosed(connection_id));
        }

        // 空の更新でも時刻と更新者だけは刻む
        if update.is_empty() {
            tracing::debug!("Empty update-state from '{}'", connection_id);
        }

        let at = Timestamp::new(self.clock.now_millis());
        let state = session.apply_update(&connection_id, update, at);

        let audience = session.audience(Audience::EveryoneExcept(connection_id));
        if let Err(e) = pusher.broadcast(&audience, &OutboundEvent::StateUpdated(state.clone())) {
            tracing::warn!("Failed to broadcast state-updated: {}", e);
        }

        Ok(Delivery {
            payload: state,
            audience,
        })
    }
}
