use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditBalance {
    pub user_id: UserId,
    pub balance: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl CreditBalance {
    pub fn new(user_id: UserId, balance: i64, now: OffsetDateTime) -> Self {
        Self {
            user_id,
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.balance >= cost
    }

    pub fn spend(
        &mut self,
        cost: i64,
        now: OffsetDateTime,
    ) -> Result<(), InsufficientCreditsError> {
        if !self.can_afford(cost) {
            return Err(InsufficientCreditsError {
                required: cost,
                available: self.balance,
            });
        }

        self.balance -= cost;
        self.updated_at = now;
        Ok(())
    }

    pub fn top_up(&mut self, amount: i64, now: OffsetDateTime) {
        self.balance = self.balance.saturating_add(amount);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientCreditsError {
    pub required: i64,
    pub available: i64,
}

impl Display for InsufficientCreditsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Insufficient credits: required {}, available {}",
            self.required, self.available
        )
    }
}

impl Error for InsufficientCreditsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub price: i64,
    pub credits: i64,
}

/// The purchasable product and what each of its price points is worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditPricing {
    product_id: String,
    tiers: Vec<PriceTier>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Unknown price: {0}")]
    UnknownPrice(String),
}

impl CreditPricing {
    pub fn new(product_id: impl Into<String>, tiers: Vec<PriceTier>) -> Self {
        Self {
            product_id: product_id.into(),
            tiers,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    pub fn ensure_known_product(&self, product_id: &str) -> Result<(), PricingError> {
        if product_id == self.product_id {
            Ok(())
        } else {
            Err(PricingError::UnknownProduct(product_id.to_string()))
        }
    }

    /// Maps a raw price field to the number of credits it buys.
    pub fn credits_for_price(&self, raw_price: &str) -> Result<i64, PricingError> {
        let price: i64 = raw_price
            .trim()
            .parse()
            .map_err(|_| PricingError::UnknownPrice(raw_price.to_string()))?;

        self.tiers
            .iter()
            .find(|tier| tier.price == price)
            .map(|tier| tier.credits)
            .ok_or_else(|| PricingError::UnknownPrice(raw_price.to_string()))
    }
}
