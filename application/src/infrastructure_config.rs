use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use domain::credits::{CreditPricing, PriceTier};
use domain::media::AssetLocation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub credits: CreditsConfig,
    pub payments: PaymentsConfig,
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

// Secrets never round-trip through serialization; they only come in from
// config files or the environment.
fn serialize_secret<S>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str("")
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
    pub run_migrations: bool,
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub redis_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub session_ttl_days: i64,
    pub public_base_url: String,
    pub frontend_url: String,
    pub google_client_id: Option<String>,
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub google_client_secret: SecretString,
    pub google_redirect_url: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn google_client_secret(&self) -> &str {
        self.google_client_secret.expose_secret()
    }

    #[must_use]
    pub fn redirect_url(&self) -> String {
        self.google_redirect_url
            .clone()
            .unwrap_or_else(|| format!("{}/login/callback", self.public_base_url))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditsConfig {
    pub initial_credits: i64,
    pub generation_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub product_id: String,
    pub price_tiers: Vec<PriceTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub engine_base_url: String,
    pub generate_path: String,
    pub request_timeout_secs: Option<u64>,
}

impl GenerationConfig {
    pub fn endpoint(&self) -> AppResult<url::Url> {
        let base = url::Url::parse(&self.engine_base_url).map_err(|e| AppError::ConfigError {
            message: format!("Invalid generation engine_base_url: {e}"),
        })?;

        base.join(&self.generate_path)
            .map_err(|e| AppError::ConfigError {
                message: format!("Invalid generation generate_path: {e}"),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub account_id: String,
    pub access_key: String,
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub secret_key: SecretString,
    pub bucket_name: String,
    pub public_base_url: String,
    pub asset_extension: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "postflow_session".to_string(),
            cookie_secure: false,
            session_ttl_days: 7,
            public_base_url: "http://localhost:3000".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            google_client_id: None,
            google_client_secret: SecretString::from(""),
            google_redirect_url: None,
        }
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            product_id: "ehajql".to_string(),
            price_tiers: vec![
                PriceTier {
                    price: 500,
                    credits: 10,
                },
                PriceTier {
                    price: 900,
                    credits: 30,
                },
                PriceTier {
                    price: 1500,
                    credits: 50,
                },
            ],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key: String::new(),
            secret_key: SecretString::from(""),
            bucket_name: String::new(),
            public_base_url: "http://localhost:9000/videos".to_string(),
            asset_extension: "mp4".to_string(),
            content_type: "video/mp4".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            db: DbConfig {
                database_url: SecretString::from(""),
                pool_size: 10,
                query_timeout_secs: 10,
                run_migrations: true,
            },
            redis: RedisConfig {
                redis_url: "redis://localhost:6379".to_string(),
            },
            auth: AuthConfig::default(),
            credits: CreditsConfig {
                initial_credits: 1,
                generation_cost: 1,
            },
            payments: PaymentsConfig::default(),
            generation: GenerationConfig {
                engine_base_url: "http://127.0.0.1:5000".to_string(),
                generate_path: "/generate".to_string(),
                request_timeout_secs: None,
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.db.database_url.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "database_url cannot be empty".to_string(),
            });
        }

        if self.db.pool_size == 0 {
            return Err(AppError::ConfigError {
                message: "db pool_size must be greater than 0".to_string(),
            });
        }

        if self.db.query_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "db query_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.redis.redis_url.is_empty() {
            return Err(AppError::ConfigError {
                message: "redis_url cannot be empty".to_string(),
            });
        }

        if self.auth.session_ttl_days <= 0 {
            return Err(AppError::ConfigError {
                message: "session_ttl_days must be greater than 0".to_string(),
            });
        }

        if self.auth.google_client_id.is_some() && self.auth.google_client_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "google_client_secret is required when google_client_id is set"
                    .to_string(),
            });
        }

        if self.credits.initial_credits < 0 {
            return Err(AppError::ConfigError {
                message: "initial_credits must be greater than or equal to 0".to_string(),
            });
        }

        if self.credits.generation_cost <= 0 {
            return Err(AppError::ConfigError {
                message: "generation_cost must be greater than 0".to_string(),
            });
        }

        self.validate_payments()?;

        self.generation.endpoint()?;

        if url::Url::parse(&self.storage.public_base_url).is_err() {
            return Err(AppError::ConfigError {
                message: "storage public_base_url must be an absolute URL".to_string(),
            });
        }

        if self.storage.asset_extension.trim_start_matches('.').is_empty() {
            return Err(AppError::ConfigError {
                message: "storage asset_extension cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn validate_payments(&self) -> AppResult<()> {
        if self.payments.product_id.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "payments product_id cannot be empty".to_string(),
            });
        }

        if self.payments.price_tiers.is_empty() {
            return Err(AppError::ConfigError {
                message: "payments price_tiers cannot be empty".to_string(),
            });
        }

        let mut seen_prices = HashSet::new();
        for tier in &self.payments.price_tiers {
            if tier.credits <= 0 {
                return Err(AppError::ConfigError {
                    message: format!("price tier {} must grant at least one credit", tier.price),
                });
            }
            if !seen_prices.insert(tier.price) {
                return Err(AppError::ConfigError {
                    message: format!("Duplicate price tier: {}", tier.price),
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn credit_pricing(&self) -> CreditPricing {
        CreditPricing::new(
            self.payments.product_id.clone(),
            self.payments.price_tiers.clone(),
        )
    }

    #[must_use]
    pub fn asset_location(&self) -> AssetLocation {
        AssetLocation::new(
            self.storage.public_base_url.clone(),
            self.storage.asset_extension.clone(),
            self.storage.content_type.clone(),
        )
    }
}
