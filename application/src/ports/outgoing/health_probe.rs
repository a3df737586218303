use std::sync::Arc;

use crate::error::AppResult;

#[async_trait::async_trait]
pub trait HealthProbePort: Send + Sync {
    /// Fails with `ServiceUnavailable` when the backing store cannot be reached.
    async fn ping(&self) -> AppResult<()>;
}

pub type DynHealthProbePort = Arc<dyn HealthProbePort>;
