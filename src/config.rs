use std::{env, path::PathBuf};

use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: SecretString,
    pub max_connections: u32,
    pub port: u16,
    pub admin_api_key: SecretString,
    pub media_root: PathBuf,
    pub media_url: String,
    pub json_logs: bool,
}

impl Config {
    pub fn init() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let admin_api_key = SecretString::from(env::var("ADMIN_API_KEY").unwrap_or_default());
        if admin_api_key.expose_secret().is_empty() {
            anyhow::bail!("ADMIN_API_KEY must be set and non-empty");
        }

        Ok(Config {
            database_url: SecretString::from(database_url),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            port: parse_or("PORT", 8080),
            admin_api_key,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            media_url: normalize_media_url(
                &env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
            ),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// The media URL is used as a prefix, so it always ends with `/`.
fn normalize_media_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
