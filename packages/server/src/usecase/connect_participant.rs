//! UseCase: 接続処理（Session Bootstrap）
//!
//! ### 何をしているか
//! - 新しい接続を開き、送信チャンネルを MessagePusher に登録する
//! - その接続にだけ、現在の共有状態（initial-state）と参加者一覧（musicians-list）をこの順で送る
//!
//! ### 前提
//! - イベントループ上で 1 接続につき 1 回だけ、その接続の他のイベントより先に実行される
//! - 送る共有状態はこの時点のスナップショットで、処理中の更新が混ざることはない

use crate::domain::{
    Audience, ConnectionId, MessagePusher, OutboundEvent, PusherChannel, Session, SharedState,
};

use super::error::ConnectError;

/// 接続処理のユースケース
#[derive(Debug, Default)]
pub struct ConnectParticipantUseCase;

impl ConnectParticipantUseCase {
    pub fn new() -> Self {
        Self
    }

    /// 接続を開いてブートストラップを送信する
    ///
    /// # Returns
    ///
    /// * `Ok(SharedState)` - 新しい接続に送った共有状態のスナップショット
    /// * `Err(ConnectError)` - 同じ接続 ID が既に開いている
    pub fn execute(
        &self,
        session: &mut Session,
        pusher: &mut dyn MessagePusher,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<SharedState, ConnectError> {
        if !session.open_connection(connection_id) {
            return Err(ConnectError::AlreadyConnected(connection_id));
        }
        pusher.register_client(connection_id, sender);

        let snapshot = session.snapshot();
        let bootstrap = [
            OutboundEvent::InitialState(snapshot.clone()),
            OutboundEvent::MusiciansList(session.participants()),
        ];
        let newcomer = session.audience(Audience::Only(connection_id));
        for event in &bootstrap {
            for target in &newcomer {
                if let Err(e) = pusher.push_to(target, event) {
                    tracing::warn!("Failed to push {} to '{}': {}", event.name(), target, e);
                }
            }
        }

        Ok(snapshot)
    }
}
