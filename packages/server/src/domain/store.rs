//! Shared State Store
//!
//! 共有状態の唯一の正本を保持し、部分更新を last-writer-wins で適用する。

use super::{
    entity::{SharedState, StateUpdate},
    registry::ConnectionRegistry,
    value_object::{ConnectionId, Timestamp},
};

#[derive(Debug, Default)]
pub struct SharedStateStore {
    state: SharedState,
}

impl SharedStateStore {
    /// 既定値（tempo=120, key=C, section=Intro）で作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の共有状態のコピーを返す
    pub fn snapshot(&self) -> SharedState {
        self.state.clone()
    }

    /// 部分更新を適用し、マージ後の全状態を返す
    ///
    /// `updated_by` には更新元の接続の表示名（未登録なら `unknown`）が入る。
    /// 値の検証はしない。
    pub fn apply_update(
        &mut self,
        registry: &ConnectionRegistry,
        connection_id: &ConnectionId,
        update: StateUpdate,
        at: Timestamp,
    ) -> SharedState {
        let updated_by = registry.display_name_of(connection_id);
        self.state.merge(update, updated_by, at);
        self.snapshot()
    }
}
