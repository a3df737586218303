use thiserror::Error;

use crate::credits::PricingError;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Invalid asset reference: {0}")]
    InvalidAssetReference(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
