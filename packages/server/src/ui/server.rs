//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::usecase::CoordinatorHandle;

use super::{
    config::ServerConfig,
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid allowed origin '{0}'")]
    InvalidOrigin(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Musician sync server
///
/// # Example
///
/// ```ignore
/// let coordinator = BroadcastCoordinator::new(session, pusher, clock).spawn();
/// Server::new(coordinator, ServerConfig::default()).run().await?;
/// ```
pub struct Server {
    /// Broadcast Coordinator へのハンドル
    coordinator: CoordinatorHandle,
    config: ServerConfig,
}

impl Server {
    pub fn new(coordinator: CoordinatorHandle, config: ServerConfig) -> Self {
        Self {
            coordinator,
            config,
        }
    }

    /// ルーティングを組み立てる
    ///
    /// - `/api/health`: ヘルスチェック
    /// - `/ws`: イベントプロトコル
    /// - それ以外: 静的ファイル（見つからなければ index.html）
    pub fn router(&self) -> Result<Router, ServerError> {
        let app_state = Arc::new(AppState::new(self.coordinator.clone()));

        let static_dir = &self.config.static_dir;
        let static_files =
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .fallback_service(static_files)
            .layer(cors_layer(&self.config)?)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        Ok(app)
    }

    /// 設定されたアドレスで待ち受けて、シャットダウンシグナルまで動かす
    ///
    /// # Errors
    ///
    /// バインドに失敗した場合、またはサーバー実行中にエラーが起きた場合
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// 既にバインド済みのリスナーで動かす
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router()?;

        tracing::info!(
            "Musician sync server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ServerError> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let value = HeaderValue::from_str(&config.allowed_origin)
            .map_err(|_| ServerError::InvalidOrigin(config.allowed_origin.clone()))?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Session, infrastructure::message_pusher::WebSocketMessagePusher,
        usecase::BroadcastCoordinator,
    };
    use stagesync_shared::time::SystemClock;

    fn spawn_coordinator() -> CoordinatorHandle {
        BroadcastCoordinator::new(
            Session::new(),
            Box::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
        )
        .spawn()
    }

    #[test]
    fn test_cors_layer_accepts_specific_origin() {
        // テスト項目: 正しいオリジンを指定すれば CORS レイヤーが作れる
        // given (前提条件):
        let config = ServerConfig {
            allowed_origin: "http://localhost:3000".to_string(),
            ..Default::default()
        };

        // when (操作):
        let result = cors_layer(&config);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        // テスト項目: ヘッダーに使えない文字を含むオリジンはエラーになる
        // given (前提条件):
        let config = ServerConfig {
            allowed_origin: "http://bad\norigin".to_string(),
            ..Default::default()
        };

        // when (操作):
        let result = cors_layer(&config);

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidOrigin(_))));
    }

    #[tokio::test]
    async fn test_router_fails_on_invalid_origin() {
        // テスト項目: 不正なオリジン設定ではルーターを組み立てられない
        // given (前提条件):
        let server = Server::new(
            spawn_coordinator(),
            ServerConfig {
                allowed_origin: "\u{7f}".to_string(),
                ..Default::default()
            },
        );

        // when (操作):
        let result = server.router();

        // then (期待する結果):
        assert!(result.is_err());
    }
}
