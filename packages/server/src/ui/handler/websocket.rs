//! WebSocket connection handlers.
//!
//! 1 接続につき 2 つのタスクを動かす。
//! - 受信タスク: テキストフレームをデコードしてコーディネーターに送る
//! - 送信タスク（pusher_loop）: コーディネーターから届いた JSON をソケットに書き込む
//!
//! どちらかが終わったらもう一方を止め、`Disconnected` をちょうど 1 回送る。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, StateUpdate},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::InboundEvent,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The channel closes when the coordinator unregisters this connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// テキストフレームを InboundEvent に変換する
///
/// JSON として壊れているもの、未知のイベント名、ペイロードの型が合わないものは `None`。
pub(crate) fn decode_client_frame(connection_id: ConnectionId, text: &str) -> Option<InboundEvent> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropped malformed frame from '{}': {}", connection_id, e);
            return None;
        }
    };

    Some(match event {
        ClientEvent::RegisterMusician(name) => InboundEvent::Register {
            connection_id,
            name,
        },
        ClientEvent::UpdateState(update) => InboundEvent::UpdateState {
            connection_id,
            update: update.map(StateUpdate::from).unwrap_or_default(),
        },
        ClientEvent::SendMessage(text) => InboundEvent::SendMessage {
            connection_id,
            text,
        },
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    // 最初のフレームを読む前にブートストラップを依頼する
    if let Err(e) = state.coordinator.send(InboundEvent::Connected {
        connection_id,
        sender: tx,
    }) {
        tracing::error!("Cannot accept connection '{}': {}", connection_id, e);
        return;
    }

    let (sender, mut receiver) = socket.split();
    let coordinator = state.coordinator.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let Some(event) = decode_client_frame(connection_id, text.as_str()) else {
                        continue;
                    };
                    if coordinator.send(event).is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                // ping/pong は axum が処理する。バイナリは使わない
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state
        .coordinator
        .send(InboundEvent::Disconnected { connection_id })
    {
        tracing::warn!("Failed to report disconnect of '{}': {}", connection_id, e);
    }
}
