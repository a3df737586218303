pub mod credit_store;
pub mod generation_engine;
pub mod generation_ledger;
pub mod health_probe;
pub mod identity_provider;
pub mod media_asset_store;
pub mod user_store;
