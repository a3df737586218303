use bytes::Bytes;
use std::sync::Arc;

use crate::error::AppResult;
use domain::media::GeneratedAssetRef;

#[async_trait::async_trait]
pub trait GenerationEnginePort: Send + Sync {
    /// Forwards `request_body` verbatim and waits for the engine's answer.
    /// Any transport failure, non-success status or unusable body is an
    /// `UpstreamError`.
    async fn generate(&self, request_body: Bytes) -> AppResult<GeneratedAssetRef>;
}

pub type DynGenerationEnginePort = Arc<dyn GenerationEnginePort>;
