use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use domain::media::{AssetLocation, MediaAsset};
use domain::user::UserId;

use crate::{
    error::{AppError, AppResult},
    ports::{
        incoming::videos::VideoUseCase,
        outgoing::{
            credit_store::DynCreditStorePort, generation_engine::DynGenerationEnginePort,
            generation_ledger::DynGenerationLedgerPort,
            media_asset_store::DynMediaAssetStorePort,
        },
    },
};

pub struct VideoServiceDeps {
    pub credit_store: DynCreditStorePort,
    pub media_asset_store: DynMediaAssetStorePort,
    pub generation_ledger: DynGenerationLedgerPort,
    pub generation_engine: DynGenerationEnginePort,
    pub asset_location: AssetLocation,
    pub generation_cost: i64,
}

/// Coordinates the balance check, the generation call, the debit and the
/// asset record for one video request.
pub struct VideoService {
    credit_store: DynCreditStorePort,
    media_asset_store: DynMediaAssetStorePort,
    generation_ledger: DynGenerationLedgerPort,
    generation_engine: DynGenerationEnginePort,
    asset_location: AssetLocation,
    generation_cost: i64,
}

impl VideoService {
    pub fn new(deps: VideoServiceDeps) -> Self {
        Self {
            credit_store: deps.credit_store,
            media_asset_store: deps.media_asset_store,
            generation_ledger: deps.generation_ledger,
            generation_engine: deps.generation_engine,
            asset_location: deps.asset_location,
            generation_cost: deps.generation_cost,
        }
    }

    async fn ensure_affordable(&self, user_id: &UserId) -> AppResult<()> {
        let balance = match self.credit_store.get_balance(user_id).await {
            Ok(balance) => balance,
            Err(AppError::NotFound { .. }) => {
                info!(user_id = %user_id, "Video requested without a credits record");
                return Err(AppError::NoCreditsRecord { user_id: *user_id });
            }
            Err(e) => return Err(e),
        };

        if !balance.can_afford(self.generation_cost) {
            info!(
                user_id = %user_id,
                available = balance.balance,
                "Video requested with insufficient credits"
            );
            return Err(AppError::InsufficientCredits {
                message: format!(
                    "Required {} credits, but only {} available",
                    self.generation_cost, balance.balance
                ),
            });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl VideoUseCase for VideoService {
    #[instrument(skip(self))]
    async fn get_videos(&self, user_id: &UserId) -> AppResult<Vec<MediaAsset>> {
        self.media_asset_store.list_by_owner(user_id).await
    }

    #[instrument(skip(self, request_body), fields(body_len = request_body.len()))]
    async fn request_video(&self, user_id: &UserId, request_body: Bytes) -> AppResult<String> {
        self.ensure_affordable(user_id).await?;

        // Nothing has been consumed yet, so an engine failure leaves the
        // balance untouched.
        let reference = self.generation_engine.generate(request_body).await?;
        debug!(user_id = %user_id, reference = reference.as_str(), "Generation finished");

        let new_asset = self.asset_location.new_asset(*user_id, &reference);

        let settlement = self
            .generation_ledger
            .settle_generation(user_id, self.generation_cost, &new_asset)
            .await
            .inspect_err(|e| {
                warn!(
                    user_id = %user_id,
                    reference = reference.as_str(),
                    error = %e,
                    "Generated video could not be settled, discarding it"
                );
            })?;

        info!(
            user_id = %user_id,
            asset_id = settlement.asset.id.as_i64(),
            remaining_credits = settlement.remaining_credits,
            "Video generated and charged"
        );

        Ok(settlement.asset.url)
    }
}
