use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use postflow_application::error::{AppError, AppResult};
use postflow_application::infrastructure_config::Config;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "POSTFLOW_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let mut config = build_figment().extract::<Config>().map_err(|e| AppError::ConfigError {
        message: format!("Failed to load configuration: {e}"),
    })?;

    apply_database_url_fallback(&mut config);

    config.validate()?;
    Ok(config)
}

fn build_figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Honors the conventional `DATABASE_URL` when nothing more specific was set.
fn apply_database_url_fallback(config: &mut Config) {
    if !config.db.database_url().is_empty() {
        return;
    }

    if let Ok(database_url) = env::var("DATABASE_URL") {
        config.db.database_url = database_url.into();
    }
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() || !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure your secrets!");

    Ok(())
}
