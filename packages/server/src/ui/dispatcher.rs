//! Dispatcher
//!
//! 受信フレームとスイープ要求を 1 本のキューに積み、1 つのタスクで順番に処理します。
//! Registry への書き込み（登録・突き合わせ）と読み出しはすべてこのタスクを通るため、
//! 互いに並行して実行されることはなく、ブロードキャストは処理順に配信されます。

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::ConnectionId;

use super::router::{MessageRouter, RouteOutcome};

/// One unit of work for the dispatcher
#[derive(Debug, PartialEq)]
pub enum RelayEvent {
    Frame {
        connection_id: ConnectionId,
        text: String,
    },
    Sweep,
}

/// Cloneable handle used by socket tasks and the sweeper to enqueue work.
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<RelayEvent>,
}

impl DispatcherHandle {
    pub(super) fn new(tx: mpsc::UnboundedSender<RelayEvent>) -> Self {
        Self { tx }
    }

    /// Returns `false` once the dispatcher has stopped.
    pub fn submit_frame(&self, connection_id: ConnectionId, text: String) -> bool {
        self.tx
            .send(RelayEvent::Frame {
                connection_id,
                text,
            })
            .is_ok()
    }

    /// Returns `false` once the dispatcher has stopped.
    pub fn request_sweep(&self) -> bool {
        self.tx.send(RelayEvent::Sweep).is_ok()
    }
}

pub struct Dispatcher {
    router: MessageRouter,
    rx: mpsc::UnboundedReceiver<RelayEvent>,
}

impl Dispatcher {
    pub fn new(router: MessageRouter) -> (Self, DispatcherHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { router, rx }, DispatcherHandle::new(tx))
    }

    /// Process events until cancelled or until every handle is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::debug!("Dispatcher started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = self.rx.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
            }
        }
        tracing::debug!("Dispatcher stopped");
    }

    async fn handle(&self, event: RelayEvent) {
        match event {
            RelayEvent::Frame {
                connection_id,
                text,
            } => {
                let outcome = self.router.route(connection_id, &text).await;
                if let RouteOutcome::RosterBroadcast { recipients }
                | RouteOutcome::MessageBroadcast { recipients } = outcome
                {
                    tracing::debug!(
                        "Frame from '{}' broadcast to {} connections",
                        connection_id,
                        recipients
                    );
                }
            }
            RelayEvent::Sweep => {
                if let Some(recipients) = self.router.sweep().await {
                    tracing::debug!("Roster broadcast to {} connections after sweep", recipients);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::MessagePusher,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
        },
        usecase::{RegisterParticipantUseCase, SendMessageUseCase, SweepConnectionsUseCase},
    };
    use hiroba_shared::time::SystemClock;

    fn create_dispatcher() -> (Dispatcher, DispatcherHandle, Arc<WebSocketMessagePusher>) {
        let repository = Arc::new(InMemoryParticipantRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(SystemClock);
        let router = MessageRouter::new(
            Arc::new(RegisterParticipantUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock.clone(),
            )),
            Arc::new(SendMessageUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock,
            )),
            Arc::new(SweepConnectionsUseCase::new(repository, pusher.clone())),
        );
        let (dispatcher, handle) = Dispatcher::new(router);
        (dispatcher, handle, pusher)
    }

    #[tokio::test]
    async fn test_events_are_processed_in_submission_order() {
        // テスト項目: キューに積んだ順にフレームが処理・配信される
        // given (前提条件):
        let (dispatcher, handle, pusher) = create_dispatcher();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(dispatcher.run(cancel.clone()));
        let conn = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn, tx).await;

        // when (操作):
        handle.submit_frame(conn, r#"{"messageType":"register","data":"alice"}"#.to_string());
        handle.submit_frame(
            conn,
            r#"{"messageType":"message","data":"{\"text\":\"one\"}"}"#.to_string(),
        );
        handle.submit_frame(
            conn,
            r#"{"messageType":"message","data":"{\"text\":\"two\"}"}"#.to_string(),
        );

        // then (期待する結果):
        assert!(rx.recv().await.unwrap().contains(r#""messageType":"users""#));
        assert!(rx.recv().await.unwrap().contains(r#"\"message\":\"one\""#));
        assert!(rx.recv().await.unwrap().contains(r#"\"message\":\"two\""#));

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_request_evicts_closed_connection() {
        // テスト項目: スイープ要求で閉じた接続の参加者が除去され、ロスターが配信される
        // given (前提条件):
        let (dispatcher, handle, pusher) = create_dispatcher();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(dispatcher.run(cancel.clone()));
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        let (bob_tx, _bob_rx) = mpsc::unbounded_channel();
        pusher.register_client(alice, alice_tx).await;
        pusher.register_client(bob, bob_tx).await;
        handle.submit_frame(alice, r#"{"messageType":"register","data":"alice"}"#.to_string());
        handle.submit_frame(bob, r#"{"messageType":"register","data":"bob"}"#.to_string());
        alice_rx.recv().await.unwrap();
        alice_rx.recv().await.unwrap();

        // when (操作):
        pusher.unregister_client(&bob).await;
        handle.request_sweep();

        // then (期待する結果):
        assert_eq!(
            alice_rx.recv().await.unwrap(),
            r#"{"messageType":"users","dataArray":["alice"]}"#
        );

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_dispatcher() {
        // テスト項目: 停止したディスパッチャへの送信は false を返す
        // given (前提条件):
        let (dispatcher, handle, _pusher) = create_dispatcher();
        let cancel = CancellationToken::new();
        cancel.cancel();

        // when (操作):
        dispatcher.run(cancel).await;

        // then (期待する結果):
        assert!(!handle.request_sweep());
        assert!(!handle.submit_frame(ConnectionId::generate(), "{}".to_string()));
    }
}
