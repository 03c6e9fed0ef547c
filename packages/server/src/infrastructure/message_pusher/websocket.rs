//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ドメインのイベントをワイヤ形式（JSON）にエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の読み書きは UI 層（`ui/handler/websocket.rs`）で行われる。
//! この実装はチャンネルに積むだけなので、送信先が遅くてもイベントループは止まらない。

use std::collections::HashMap;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// Broadcast Coordinator が排他的に所有するため、ロックは持たない。
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: HashMap<ConnectionId, PusherChannel>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        self.clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    fn unregister_client(&mut self, connection_id: &ConnectionId) {
        self.clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let sender = self
            .clients
            .get(connection_id)
            .ok_or(MessagePushError::ClientNotFound(*connection_id))?;

        sender
            .send(Self::encode(event)?)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed {} to '{}'", event.name(), connection_id);
        Ok(())
    }

    fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;

        for target in targets {
            match self.clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.clone()) {
                        tracing::warn!("Failed to push {} to '{}': {}", event.name(), target, e);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }
        tracing::debug!("Broadcasted {} to {} connection(s)", event.name(), targets.len());

        Ok(())
    }
}
