//! Broadcast Coordinator
//!
//! 全ての接続から届くイベントを 1 本の mpsc キューで受け取り、1 つずつ処理する。
//! Session と MessagePusher を所有するのはこのループだけなので、ロックは要らない。
//!
//! - 同じ接続からのイベントは届いた順に処理される
//! - あるイベントのブロードキャストは、次のイベントの処理より先にキューへ積まれる
//! - 閉じた（または開いていない）接続からのイベントは捨てられる

use std::sync::Arc;

use stagesync_shared::time::Clock;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, Session, StateUpdate};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, RegisterParticipantUseCase,
    SendMessageUseCase, UpdateStateUseCase, error::CoordinatorError,
};

/// 接続タスクからコーディネーターへ送られるイベント
#[derive(Debug)]
pub enum InboundEvent {
    /// 接続が開いた。そのソケットの最初のフレームより先に送られる
    Connected {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Register {
        connection_id: ConnectionId,
        name: String,
    },
    UpdateState {
        connection_id: ConnectionId,
        update: StateUpdate,
    },
    SendMessage {
        connection_id: ConnectionId,
        text: String,
    },
    /// 接続が閉じた。1 接続につき 1 回だけ送られる
    Disconnected { connection_id: ConnectionId },
    /// ヘルスチェック用に登録済みの参加者数を問い合わせる
    ParticipantCount { reply: oneshot::Sender<usize> },
}

pub struct BroadcastCoordinator {
    session: Session,
    pusher: Box<dyn MessagePusher>,
    connect_participant: ConnectParticipantUseCase,
    register_participant: RegisterParticipantUseCase,
    update_state: UpdateStateUseCase,
    send_message: SendMessageUseCase,
    disconnect_participant: DisconnectParticipantUseCase,
}

impl BroadcastCoordinator {
    pub fn new(session: Session, pusher: Box<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session,
            pusher,
            connect_participant: ConnectParticipantUseCase::new(),
            register_participant: RegisterParticipantUseCase::new(clock.clone()),
            update_state: UpdateStateUseCase::new(clock.clone()),
            send_message: SendMessageUseCase::new(clock),
            disconnect_participant: DisconnectParticipantUseCase::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// イベントを 1 つ処理する
    ///
    /// ユースケースが返したエラーはログに残して捨てる。送信者に返すことはない。
    pub fn handle_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Connected {
                connection_id,
                sender,
            } => {
                match self.connect_participant.execute(
                    &mut self.session,
                    self.pusher.as_mut(),
                    connection_id,
                    sender,
                ) {
                    Ok(_) => tracing::info!(
                        "Connection '{}' opened ({} open)",
                        connection_id,
                        self.session.connection_count()
                    ),
                    Err(e) => tracing::warn!("Rejected connection: {}", e),
                }
            }
            InboundEvent::Register {
                connection_id,
                name,
            } => {
                match self.register_participant.execute(
                    &mut self.session,
                    self.pusher.as_ref(),
                    connection_id,
                    &name,
                ) {
                    Ok(delivery) => tracing::info!(
                        "Connection '{}' registered ({} musicians)",
                        connection_id,
                        delivery.payload.len()
                    ),
                    Err(e) => tracing::debug!("Dropped register-musician: {}", e),
                }
            }
            InboundEvent::UpdateState {
                connection_id,
                update,
            } => {
                match self.update_state.execute(
                    &mut self.session,
                    self.pusher.as_ref(),
                    connection_id,
                    update,
                ) {
                    Ok(delivery) => tracing::debug!(
                        "State updated by '{}', fanned out to {} connections",
                        connection_id,
                        delivery.audience.len()
                    ),
                    Err(e) => tracing::debug!("Dropped update-state: {}", e),
                }
            }
            InboundEvent::SendMessage {
                connection_id,
                text,
            } => {
                match self.send_message.execute(
                    &self.session,
                    self.pusher.as_ref(),
                    connection_id,
                    &text,
                ) {
                    Ok(delivery) => tracing::debug!(
                        "Message from '{}' relayed to {} connections",
                        delivery.payload.from,
                        delivery.audience.len()
                    ),
                    Err(e) => tracing::debug!("Dropped send-message: {}", e),
                }
            }
            InboundEvent::Disconnected { connection_id } => {
                match self.disconnect_participant.execute(
                    &mut self.session,
                    self.pusher.as_mut(),
                    connection_id,
                ) {
                    Ok(_) => tracing::info!(
                        "Connection '{}' closed ({} open)",
                        connection_id,
                        self.session.connection_count()
                    ),
                    Err(e) => tracing::debug!("Ignored disconnect: {}", e),
                }
            }
            InboundEvent::ParticipantCount { reply } => {
                // 問い合わせ側が先に諦めていても問題ない
                let _ = reply.send(self.session.participant_count());
            }
        }
    }

    /// 全ての送信側が閉じるまでイベントを処理し続ける
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<InboundEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        tracing::info!("Broadcast coordinator stopped");
    }

    /// イベントループを tokio タスクとして起動し、ハンドルを返す
    pub fn spawn(self) -> CoordinatorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(rx));
        CoordinatorHandle { tx }
    }
}

/// コーディネーターへイベントを送るためのハンドル（接続ごとに clone して使う）
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<InboundEvent>,
}

impl CoordinatorHandle {
    pub fn send(&self, event: InboundEvent) -> Result<(), CoordinatorError> {
        self.tx.send(event).map_err(|_| CoordinatorError::Stopped)
    }

    pub async fn participant_count(&self) -> Result<usize, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(InboundEvent::ParticipantCount { reply })?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, Key, Section, SharedState, Tempo};
    use crate::infrastructure::{
        dto::websocket::SharedStateDto, message_pusher::WebSocketMessagePusher,
    };
    use serde_json::Value;
    use stagesync_shared::time::FixedClock;

    struct TestClient {
        id: ConnectionId,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl TestClient {
        /// 受信済みのフレームを全て取り出す
        fn drain(&mut self) -> Vec<Value> {
            let mut frames = Vec::new();
            while let Ok(text) = self.rx.try_recv() {
                frames.push(serde_json::from_str(&text).unwrap());
            }
            frames
        }

        fn drain_types(&mut self) -> Vec<String> {
            self.drain()
                .into_iter()
                .map(|frame| frame["type"].as_str().unwrap().to_string())
                .collect()
        }
    }

    fn coordinator() -> BroadcastCoordinator {
        BroadcastCoordinator::new(
            Session::new(),
            Box::new(WebSocketMessagePusher::new()),
            Arc::new(FixedClock::new(1672531200000)),
        )
    }

    fn connect(coordinator: &mut BroadcastCoordinator) -> TestClient {
        let id = ConnectionIdFactory::generate();
        let (sender, rx) = mpsc::unbounded_channel();
        coordinator.handle_event(InboundEvent::Connected {
            connection_id: id,
            sender,
        });
        TestClient { id, rx }
    }

    fn register(coordinator: &mut BroadcastCoordinator, client: &TestClient, name: &str) {
        coordinator.handle_event(InboundEvent::Register {
            connection_id: client.id,
            name: name.to_string(),
        });
    }

    fn tempo_update(bpm: i64) -> StateUpdate {
        StateUpdate {
            tempo: Some(Tempo::new(bpm)),
            ..Default::default()
        }
    }

    #[test]
    fn test_bootstrap_sends_initial_state_then_musicians_list() {
        // テスト項目: 接続直後に initial-state、musicians-list の順で届く
        // given (前提条件):
        let mut coordinator = coordinator();

        // when (操作):
        let mut client = connect(&mut coordinator);

        // then (期待する結果):
        let frames = client.drain();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["type"], "initial-state");
        assert_eq!(frames[0]["data"]["tempo"], 120);
        assert_eq!(frames[0]["data"]["tonalite"], "C");
        assert_eq!(frames[0]["data"]["structure"], "Intro");
        assert_eq!(frames[0]["data"]["lastUpdate"], Value::Null);
        assert_eq!(frames[1]["type"], "musicians-list");
        assert_eq!(frames[1]["data"], Value::Array(vec![]));
    }

    #[test]
    fn test_late_joiner_converges_on_current_state() {
        // テスト項目: 後から接続した人は、それまでの更新を反映した状態を受け取る
        // given (前提条件):
        let mut coordinator = coordinator();
        let mut alice = connect(&mut coordinator);
        register(&mut coordinator, &alice, "alice");
        coordinator.handle_event(InboundEvent::UpdateState {
            connection_id: alice.id,
            update: tempo_update(90),
        });
        coordinator.handle_event(InboundEvent::UpdateState {
            connection_id: alice.id,
            update: StateUpdate {
                section: Some(Section::Chorus),
                ..Default::default()
            },
        });
        alice.drain();

        // when (操作):
        let mut bob = connect(&mut coordinator);

        // then (期待する結果):
        let frames = bob.drain();
        assert_eq!(frames[0]["type"], "initial-state");
        assert_eq!(frames[0]["data"]["tempo"], 90);
        assert_eq!(frames[0]["data"]["structure"], "Refrain");
        assert_eq!(frames[0]["data"]["updatedBy"], "alice");
        assert_eq!(frames[1]["data"][0]["name"], "alice");
        // 既存の接続には何も届かない（musicians-list は登録時のみ）
        assert!(alice.drain().is_empty());
    }

    #[test]
    fn test_state_update_excludes_sender() {
        // テスト項目: state-updated は送信者以外の全接続に届き、送信者には届かない
        // given (前提条件):
        let mut coordinator = coordinator();
        let mut alice = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        let mut lurker = connect(&mut coordinator);
        register(&mut coordinator, &alice, "alice");
        register(&mut coordinator, &bob, "bob");
        for client in [&mut alice, &mut bob, &mut lurker] {
            client.drain();
        }

        // when (操作):
        coordinator.handle_event(InboundEvent::UpdateState {
            connection_id: alice.id,
            update: StateUpdate {
                key: Some(Key::FSharp),
                ..Default::default()
            },
        });

        // then (期待する結果):
        assert!(alice.drain().is_empty());
        for client in [&mut bob, &mut lurker] {
            let frames = client.drain();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "state-updated");
            assert_eq!(frames[0]["data"]["tonalite"], "F#");
            assert_eq!(frames[0]["data"]["tempo"], 120);
            assert_eq!(frames[0]["data"]["updatedBy"], "alice");
        }
    }

    #[test]
    fn test_interleaved_updates_converge_on_store_state() {
        // テスト項目: 2 人が交互に更新しても、受け手が最後に受け取った状態は正本と一致する
        // given (前提条件):
        let mut coordinator = coordinator();
        let mut alice = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        let mut carol = connect(&mut coordinator);
        register(&mut coordinator, &alice, "alice");
        register(&mut coordinator, &bob, "bob");
        for client in [&mut alice, &mut bob, &mut carol] {
            client.drain();
        }
        let updates = [
            (alice.id, tempo_update(100)),
            (
                bob.id,
                StateUpdate {
                    key: Some(Key::D),
                    notes: Some("watch the drummer".to_string()),
                    ..Default::default()
                },
            ),
            (
                alice.id,
                StateUpdate {
                    section: Some(Section::Verse),
                    ..Default::default()
                },
            ),
            (bob.id, tempo_update(104)),
            (
                alice.id,
                StateUpdate {
                    key: Some(Key::Custom("Bb".to_string())),
                    ..Default::default()
                },
            ),
        ];

        // when (操作):
        for (connection_id, update) in updates {
            coordinator.handle_event(InboundEvent::UpdateState {
                connection_id,
                update,
            });
        }

        // then (期待する結果):
        let expected =
            serde_json::to_value(SharedStateDto::from(coordinator.session().snapshot())).unwrap();
        assert_eq!(expected["tempo"], 104);
        assert_eq!(expected["tonalite"], "Bb");
        assert_eq!(expected["structure"], "Couplet");
        assert_eq!(expected["notes"], "watch the drummer");
        assert_eq!(expected["updatedBy"], "alice");
        for client in [&mut bob, &mut carol] {
            let frames = client.drain();
            let last = frames.last().unwrap();
            assert_eq!(last["type"], "state-updated");
            assert_eq!(last["data"], expected);
        }
        // alice が最後に受け取ったのは bob の最後の更新
        let alice_frames = alice.drain();
        assert_eq!(alice_frames.len(), 2);
        assert_eq!(alice_frames[1]["data"]["tempo"], 104);
        assert_eq!(alice_frames[1]["data"]["updatedBy"], "bob");
    }

    #[test]
    fn test_chat_message_includes_sender() {
        // テスト項目: new-message は送信者を含む全接続に届く
        // given (前提条件):
        let mut coordinator = coordinator();
        let mut alice = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        register(&mut coordinator, &alice, "alice");
        alice.drain();
        bob.drain();

        // when (操作):
        coordinator.handle_event(InboundEvent::SendMessage {
            connection_id: alice.id,
            text: "from the top".to_string(),
        });

        // then (期待する結果):
        for client in [&mut alice, &mut bob] {
            let frames = client.drain();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "new-message");
            assert_eq!(frames[0]["data"]["from"], "alice");
            assert_eq!(frames[0]["data"]["text"], "from the top");
            assert_eq!(frames[0]["data"]["timestamp"], "2023-01-01T00:00:00.000Z");
        }
    }

    #[test]
    fn test_unregistered_sender_is_attributed_to_unknown() {
        // テスト項目: 未登録の接続からの更新とメッセージは unknown として扱われる
        // given (前提条件):
        let mut coordinator = coordinator();
        let anonymous = connect(&mut coordinator);
        let mut observer = connect(&mut coordinator);
        observer.drain();

        // when (操作):
        coordinator.handle_event(InboundEvent::UpdateState {
            connection_id: anonymous.id,
            update: tempo_update(140),
        });
        coordinator.handle_event(InboundEvent::SendMessage {
            connection_id: anonymous.id,
            text: "hi".to_string(),
        });

        // then (期待する結果):
        let frames = observer.drain();
        assert_eq!(frames[0]["data"]["updatedBy"], "unknown");
        assert_eq!(frames[1]["data"]["from"], "unknown");
        assert_eq!(coordinator.session().snapshot().tempo, Tempo::new(140));
    }

    #[test]
    fn test_double_disconnect_broadcasts_once() {
        // テスト項目: 二重の切断通知でも musicians-list は 1 回だけ送られる
        // given (前提条件):
        let mut coordinator = coordinator();
        let alice = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        register(&mut coordinator, &alice, "alice");
        bob.drain();

        // when (操作):
        coordinator.handle_event(InboundEvent::Disconnected {
            connection_id: alice.id,
        });
        coordinator.handle_event(InboundEvent::Disconnected {
            connection_id: alice.id,
        });

        // then (期待する結果):
        assert_eq!(bob.drain_types(), vec!["musicians-list"]);
        assert_eq!(coordinator.session().participant_count(), 0);
        assert_eq!(coordinator.session().connection_count(), 1);
    }

    #[test]
    fn test_events_after_disconnect_are_dropped() {
        // テスト項目: 切断後に届いたイベントは捨てられる
        // given (前提条件):
        let mut coordinator = coordinator();
        let alice = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        coordinator.handle_event(InboundEvent::Disconnected {
            connection_id: alice.id,
        });
        bob.drain();

        // when (操作):
        register(&mut coordinator, &alice, "ghost");
        coordinator.handle_event(InboundEvent::UpdateState {
            connection_id: alice.id,
            update: tempo_update(200),
        });

        // then (期待する結果):
        assert!(bob.drain().is_empty());
        assert_eq!(coordinator.session().snapshot(), SharedState::default());
        assert_eq!(coordinator.session().participant_count(), 0);
    }

    #[test]
    fn test_disconnect_of_unregistered_connection_is_silent() {
        // テスト項目: 登録前に切断した接続では musicians-list は送られない
        // given (前提条件):
        let mut coordinator = coordinator();
        let lurker = connect(&mut coordinator);
        let mut bob = connect(&mut coordinator);
        bob.drain();

        // when (操作):
        coordinator.handle_event(InboundEvent::Disconnected {
            connection_id: lurker.id,
        });

        // then (期待する結果):
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_coordinator_answers_participant_count() {
        // テスト項目: 起動したコーディネーターがイベントを順に処理し、参加者数を返す
        // given (前提条件):
        let handle = coordinator().spawn();
        let id = ConnectionIdFactory::generate();
        let (sender, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        handle
            .send(InboundEvent::Connected {
                connection_id: id,
                sender,
            })
            .unwrap();
        handle
            .send(InboundEvent::Register {
                connection_id: id,
                name: "alice".to_string(),
            })
            .unwrap();
        let count = handle.participant_count().await;

        // then (期待する結果):
        assert_eq!(count, Ok(1));
        let first: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(first["type"], "initial-state");
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_coordinator() {
        // テスト項目: コーディネーターが止まっていると Stopped が返る
        // given (前提条件):
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = CoordinatorHandle { tx };

        // when (操作):
        let result = handle.participant_count().await;

        // then (期待する結果):
        assert_eq!(result, Err(CoordinatorError::Stopped));
    }
}
