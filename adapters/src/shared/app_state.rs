use std::sync::Arc;

use postflow_application::infrastructure_config::Config;
use postflow_application::ports::{
    incoming::{
        auth::IdentityUseCase, credits::CreditsUseCase, payments::PaymentUseCase,
        users::UserUseCase, videos::VideoUseCase,
    },
    outgoing::health_probe::DynHealthProbePort,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity_use_case: Arc<dyn IdentityUseCase>,
    pub user_use_case: Arc<dyn UserUseCase>,
    pub credits_use_case: Arc<dyn CreditsUseCase>,
    pub video_use_case: Arc<dyn VideoUseCase>,
    pub payment_use_case: Arc<dyn PaymentUseCase>,
    pub health_probe: DynHealthProbePort,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        identity_use_case: Arc<dyn IdentityUseCase>,
        user_use_case: Arc<dyn UserUseCase>,
        credits_use_case: Arc<dyn CreditsUseCase>,
        video_use_case: Arc<dyn VideoUseCase>,
        payment_use_case: Arc<dyn PaymentUseCase>,
        health_probe: DynHealthProbePort,
    ) -> Self {
        Self {
            config,
            identity_use_case,
            user_use_case,
            credits_use_case,
            video_use_case,
            payment_use_case,
            health_probe,
        }
    }
}
