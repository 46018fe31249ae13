use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `GOOGLE_API_KEY` holds the primary Gemini credential; `GOOGLE_API_KEYS`
/// may carry a comma-separated list of additional keys for the rotation pool.
/// An empty pool is allowed: the server starts, and every AI call reports a
/// configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_keys: Vec<String>,
    pub port: u16,
    pub static_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_keys: collect_api_keys(
                std::env::var("GOOGLE_API_KEY").ok(),
                std::env::var("GOOGLE_API_KEYS").ok(),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Merges the primary key and the comma-separated pool into one ordered,
/// deduplicated list. Blank entries are dropped.
fn collect_api_keys(primary: Option<String>, pool: Option<String>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    if let Some(key) = primary {
        let key = key.trim();
        if !key.is_empty() {
            keys.push(key.to_string());
        }
    }
    if let Some(list) = pool {
        for key in list.split(',') {
            let key = key.trim();
            if !key.is_empty() && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}
