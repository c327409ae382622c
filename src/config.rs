use dotenvy::dotenv;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub resume_storage_path: PathBuf,
    pub bcrypt_cost: u32,
    pub approval_cache_ttl: Duration,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load environment variables (and `.env`) and apply defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/household_services.db".to_string()),
            host: env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("APP_PORT", 3000)?,
            jwt_secret,
            token_ttl_secs: parse_var("TOKEN_TTL_SECS", 36000)?,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password,
            resume_storage_path: PathBuf::from(
                env::var("RESUME_STORAGE_PATH").unwrap_or_else(|_| "static/pdfs".to_string()),
            ),
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            approval_cache_ttl: Duration::from_secs(parse_var("APPROVAL_CACHE_TTL_SECS", 60)?),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            name: "APP_HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            jwt_secret: "secret".to_string(),
            token_ttl_secs: 60,
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            resume_storage_path: PathBuf::from("static/pdfs"),
            bcrypt_cost: 4,
            approval_cache_ttl: Duration::from_secs(1),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let addr = sample().socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
    }

    #[test]
    fn invalid_host_is_reported() {
        let mut config = sample();
        config.host = "not-an-ip".to_string();
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::Invalid { name: "APP_HOST", .. })
        ));
    }
}
