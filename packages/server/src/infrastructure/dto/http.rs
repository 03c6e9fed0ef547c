//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/health` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub connected_musicians: usize,
    /// Seconds since the server started
    pub uptime: f64,
}

impl HealthDto {
    pub fn ok(connected_musicians: usize, uptime: f64) -> Self {
        Self {
            status: "ok".to_string(),
            connected_musicians,
            uptime,
        }
    }
}
