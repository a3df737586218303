use std::sync::Arc;

use crate::error::AppResult;
use domain::media::{MediaAsset, NewMediaAsset};
use domain::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettlement {
    pub remaining_credits: i64,
    pub asset: MediaAsset,
}

/// Charges for a finished generation and records its asset atomically.
///
/// Implementations must guard the debit on `balance >= cost` in the same
/// statement that applies it, and must not leave a debit behind when the asset
/// cannot be recorded. Errors:
/// - `NoCreditsRecord` when the user has no ledger row,
/// - `InsufficientCredits` when the guard rejects the debit,
/// - `LedgerUpdateFailed` when the debit itself cannot be persisted,
/// - `AssetRecordFailed` when the asset insert fails (the debit is rolled back).
#[async_trait::async_trait]
pub trait GenerationLedgerPort: Send + Sync {
    async fn settle_generation(
        &self,
        user_id: &UserId,
        cost: i64,
        asset: &NewMediaAsset,
    ) -> AppResult<GenerationSettlement>;
}

pub type DynGenerationLedgerPort = Arc<dyn GenerationLedgerPort>;
