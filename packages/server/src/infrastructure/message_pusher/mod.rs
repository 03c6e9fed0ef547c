//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの送信チャンネルを経由して WebSocket に書き出す実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
