use std::io;
use thiserror::Error;

use domain::credits::PricingError;
use domain::error::DomainError;
use domain::user::UserId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("No credits record for user {user_id}")]
    NoCreditsRecord { user_id: UserId },

    #[error("Insufficient credits: {message}")]
    InsufficientCredits { message: String },

    #[error("Unknown product: {product_id}")]
    UnknownProduct { product_id: String },

    #[error("Unknown price: {price}")]
    UnknownPrice { price: String },

    #[error("Generation engine error: {message}")]
    UpstreamError { message: String },

    #[error("Credit ledger update failed: {message}")]
    LedgerUpdateFailed { message: String },

    #[error("Media asset record failed: {message}")]
    AssetRecordFailed { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("External service error: {message}")]
    ExternalServiceError { message: String },

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    InternalServerError,
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::UnknownProduct(product_id) => AppError::UnknownProduct { product_id },
            PricingError::UnknownPrice(price) => AppError::UnknownPrice { price },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
