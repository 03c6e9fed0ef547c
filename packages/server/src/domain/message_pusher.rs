//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信のインターフェース。具体的な実装は Infrastructure 層が提供する。
//! 送信は fire-and-forget で、呼び出し側は配信の成否に依存しない。

use thiserror::Error;
use tokio::sync::mpsc;

use super::{event::OutboundEvent, value_object::ConnectionId};

/// クライアントごとの送信チャンネル（シリアライズ済みのフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(ConnectionId),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// イベント送信の抽象化
///
/// 実装は送信でブロックしてはならない（イベントループを止めないため）。
#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send {
    /// 接続の送信チャンネルを登録
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    fn unregister_client(&mut self, connection_id: &ConnectionId);

    /// 特定の接続に送信
    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に送信（一部の失敗は許容）
    fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
