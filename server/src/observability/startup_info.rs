use postflow_application::infrastructure_config::{Config, PaymentsConfig};
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_routes(config);
    print_configuration_info(config);
}

fn print_routes(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 Routes:");
    info!("  🔑 Login: {}/login", base_url);
    info!("  💳 Payment webhook: {}/payment/webhook", base_url);
    info!("  🎬 Generate: {}/api/generate", base_url);
    info!("  ❤️  Health: {}/health", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    info!(
        "  🪙 Credits: {} on signup, {} per video",
        config.credits.initial_credits, config.credits.generation_cost
    );
    print_price_tiers(&config.payments);
    info!(
        "  🎞️  Generation engine: {}{}",
        config.generation.engine_base_url, config.generation.generate_path
    );
    info!("  📦 Public videos: {}", config.storage.public_base_url);
    info!(
        "  🍪 Sessions: Redis, cookie '{}', {} day inactivity expiry",
        config.auth.cookie_name, config.auth.session_ttl_days
    );
    if config.auth.google_client_id.is_none() {
        info!("  ⚠️  Google client id is not configured; login will fail");
    }
}

fn print_price_tiers(payments: &PaymentsConfig) {
    info!("  💳 Product '{}':", payments.product_id);
    for tier in &payments.price_tiers {
        info!("    • {} → {} credits", tier.price, tier.credits);
    }
}
