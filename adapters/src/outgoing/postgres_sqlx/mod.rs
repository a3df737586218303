pub mod credit_store_postgres;
pub mod generation_ledger_postgres;
pub mod health_probe_postgres;
pub mod media_asset_store_postgres;
pub mod user_store_postgres;
pub mod utils;

#[cfg(test)]
mod test_fixtures;
