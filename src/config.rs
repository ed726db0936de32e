use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration, read once from the environment with the `CATALOG_`
/// prefix (e.g. `CATALOG_DATABASE_URL`). Missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen: String,
    pub loglevel: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds (also the cookie max-age).
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl: i64,
    /// Set the `Secure` attribute on auth cookies.
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:catalog.sqlite".to_string(),
            listen: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            access_token_secret: "dev-access-secret".to_string(),
            refresh_token_secret: "dev-refresh-secret".to_string(),
            access_token_ttl: 60 * 60,
            refresh_token_ttl: 7 * 24 * 60 * 60,
            secure_cookies: false,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("CATALOG_"))
        .extract()
        .expect("invalid CATALOG_* environment configuration")
});
