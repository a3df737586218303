use serde::Deserialize;
use validator::Validate;

use postflow_application::ports::incoming::payments::PaymentNotification;

/// Form body posted by the payment provider once a purchase completes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentWebhookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "short_product_id is required"))]
    pub short_product_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "price is required"))]
    pub price: String,
}

impl From<PaymentWebhookForm> for PaymentNotification {
    fn from(form: PaymentWebhookForm) -> Self {
        Self {
            email: form.email.trim().to_string(),
            product_id: form.short_product_id.trim().to_string(),
            price: form.price.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteAccountForm {
    #[serde(default)]
    #[validate(custom(function = "validate_confirmation"))]
    pub confirmation: String,
}

fn validate_confirmation(value: &str) -> Result<(), validator::ValidationError> {
    if value == "confirm" {
        Ok(())
    } else {
        Err(validator::ValidationError::new("confirmation")
            .with_message("confirmation must be \"confirm\"".into()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
