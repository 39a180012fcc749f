use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Live counters for the sync layer plus host resource usage
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub n_channels: u32,
    pub n_subscribers: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
