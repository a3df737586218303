use axum::{Json, extract::State};
use tracing::info;

use crate::incoming::http_axum::{
    core::extractors::ValidatedForm,
    dto::{
        requests::PaymentWebhookForm,
        responses::{ApiResponse, PaymentAcceptedResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn payment_webhook(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<PaymentWebhookForm>,
) -> Result<Json<ApiResponse<PaymentAcceptedResponse>>, HttpError> {
    let outcome = state.payment_use_case.handle_payment(form.into()).await?;

    info!(
        user_id = %outcome.user_id,
        credits_added = outcome.credits_added,
        "Payment webhook processed"
    );

    Ok(Json(ApiResponse::success_with_data(Some(
        PaymentAcceptedResponse {
            credits_added: outcome.credits_added,
        },
    ))))
}
