//! Shared application state for handlers.

use std::time::Instant;

use crate::usecase::CoordinatorHandle;

pub struct AppState {
    /// Broadcast Coordinator へのハンドル（全ての変更はここを経由する）
    pub coordinator: CoordinatorHandle,
    /// 稼働時間の計算用
    pub started_at: Instant,
}

impl AppState {
    pub fn new(coordinator: CoordinatorHandle) -> Self {
        Self {
            coordinator,
            started_at: Instant::now(),
        }
    }
}
