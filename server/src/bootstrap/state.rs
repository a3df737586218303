use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use postflow_adapters::outgoing::{
    generation_http::HttpGenerationEngine,
    identity_google::GoogleIdentityProvider,
    postgres_sqlx::{
        credit_store_postgres::PostgresCreditStoreAdapter,
        generation_ledger_postgres::PostgresGenerationLedgerAdapter,
        health_probe_postgres::PostgresHealthProbe,
        media_asset_store_postgres::PostgresMediaAssetStoreAdapter,
        user_store_postgres::PostgresUserStoreAdapter,
    },
};
use postflow_adapters::shared::app_state::AppState as AdaptersAppState;
use postflow_application::error::AppError;
use postflow_application::infrastructure_config::Config;
use postflow_application::ports::incoming::{
    auth::IdentityUseCase, credits::CreditsUseCase, payments::PaymentUseCase, users::UserUseCase,
    videos::VideoUseCase,
};
use postflow_application::ports::outgoing::{
    credit_store::DynCreditStorePort, generation_engine::DynGenerationEnginePort,
    generation_ledger::DynGenerationLedgerPort, health_probe::DynHealthProbePort,
    identity_provider::DynIdentityProviderPort, media_asset_store::DynMediaAssetStorePort,
    user_store::DynUserStorePort,
};
use postflow_application::{
    auth::service::IdentityService,
    credits::service::CreditsService,
    payments::service::PaymentService,
    users::service::UserService,
    videos::service::{VideoService, VideoServiceDeps},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_store: DynUserStorePort,
    pub identity_service: Arc<dyn IdentityUseCase>,
    pub user_service: Arc<dyn UserUseCase>,
    pub credits_service: Arc<dyn CreditsUseCase>,
    pub video_service: Arc<dyn VideoUseCase>,
    pub payment_service: Arc<dyn PaymentUseCase>,
    pub health_probe: DynHealthProbePort,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let db_pool = Self::create_database_pool(&config).await?;
        if config.db.run_migrations {
            Self::run_migrations(&db_pool).await?;
        }

        let timeout_secs = config.db.query_timeout_secs;
        let user_store: DynUserStorePort =
            Arc::new(PostgresUserStoreAdapter::new(db_pool.clone(), timeout_secs));
        let credit_store: DynCreditStorePort =
            Arc::new(PostgresCreditStoreAdapter::new(db_pool.clone(), timeout_secs));
        let media_asset_store: DynMediaAssetStorePort = Arc::new(
            PostgresMediaAssetStoreAdapter::new(db_pool.clone(), timeout_secs),
        );
        let generation_ledger: DynGenerationLedgerPort = Arc::new(
            PostgresGenerationLedgerAdapter::new(db_pool.clone(), timeout_secs),
        );
        let health_probe: DynHealthProbePort =
            Arc::new(PostgresHealthProbe::new(db_pool, timeout_secs));

        let identity_provider: DynIdentityProviderPort =
            Arc::new(GoogleIdentityProvider::new(&config.auth)?);
        let generation_engine: DynGenerationEnginePort =
            Arc::new(HttpGenerationEngine::from_config(&config.generation)?);

        let identity_service = Arc::new(IdentityService::new(
            identity_provider,
            Arc::clone(&user_store),
            config.credits.initial_credits,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&user_store)));
        let credits_service = Arc::new(CreditsService::new(Arc::clone(&credit_store)));
        let payment_service = Arc::new(PaymentService::new(
            config.credit_pricing(),
            Arc::clone(&user_store),
            Arc::clone(&credit_store),
            config.credits.initial_credits,
        ));
        let video_service = Arc::new(VideoService::new(VideoServiceDeps {
            credit_store,
            media_asset_store,
            generation_ledger,
            generation_engine,
            asset_location: config.asset_location(),
            generation_cost: config.credits.generation_cost,
        }));

        Ok(Self {
            config,
            user_store,
            identity_service,
            user_service,
            credits_service,
            video_service,
            payment_service,
            health_probe,
        })
    }

    async fn create_database_pool(config: &Config) -> Result<PgPool, AppError> {
        PgPoolOptions::new()
            .max_connections(config.db.pool_size)
            .acquire_timeout(Duration::from_secs(config.db.query_timeout_secs))
            .connect(config.db.database_url())
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })
    }

    async fn run_migrations(db_pool: &PgPool) -> Result<(), AppError> {
        sqlx::migrate!("../migrations")
            .run(db_pool)
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations applied");
        Ok(())
    }

    pub fn to_adapters_state(self) -> (AdaptersAppState, DynUserStorePort) {
        let adapters_state = AdaptersAppState::new(
            self.config,
            self.identity_service,
            self.user_service,
            self.credits_service,
            self.video_service,
            self.payment_service,
            self.health_probe,
        );

        (adapters_state, self.user_store)
    }
}
