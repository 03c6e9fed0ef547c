//! Message Log Relay
//!
//! チャットメッセージに送信者と時刻を付けるだけの、状態を持たない中継。
//! 保存・フィルタ・レート制限は行わない。

use super::{
    entity::ChatMessage,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, Timestamp},
};

pub struct MessageRelay;

impl MessageRelay {
    /// 送信者の表示名（未登録なら `unknown`）と時刻を付けた ChatMessage を作る
    pub fn relay(
        registry: &ConnectionRegistry,
        connection_id: &ConnectionId,
        text: String,
        at: Timestamp,
    ) -> ChatMessage {
        ChatMessage::new(registry.display_name_of(connection_id), text, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, DisplayName};

    #[test]
    fn test_relay_attributes_registered_sender() {
        // テスト項目: 登録済みの送信者の表示名が from に入る
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let alice = ConnectionIdFactory::generate();
        registry.register(alice, DisplayName::new("alice"), Timestamp::new(0));

        // when (操作):
        let message =
            MessageRelay::relay(&registry, &alice, "hello".to_string(), Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(message.from, DisplayName::new("alice"));
        assert_eq!(message.text, "hello");
        assert_eq!(message.timestamp, Timestamp::new(1000));
    }

    #[test]
    fn test_relay_from_unregistered_sender_uses_sentinel() {
        // テスト項目: 未登録の送信者は unknown として中継される
        // given (前提条件):
        let registry = ConnectionRegistry::new();

        // when (操作):
        let message = MessageRelay::relay(
            &registry,
            &ConnectionIdFactory::generate(),
            "hi".to_string(),
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert_eq!(message.from, DisplayName::unknown());
    }
}
