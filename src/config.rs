use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub storage_backend: StorageBackend,
    pub db_max_connections: u32,
    pub api_rps: u32,
    pub run_migrations: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend = get_env_or("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url,
            storage_backend,
            db_max_connections: get_env_or("DB_MAX_CONNECTIONS", 20)?,
            api_rps: get_env_or("API_RPS", 100)?,
            run_migrations: get_env_or("RUN_MIGRATIONS", true)?,
        })
    }

    /// In-memory configuration bound to an ephemeral local port.
    pub fn in_memory() -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            database_url: None,
            storage_backend: StorageBackend::Memory,
            db_max_connections: 1,
            api_rps: 100,
            run_migrations: false,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    init_with(Config::from_env()?)
}

pub fn init_with(config: Config) -> Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_known_names() {
        assert_eq!("postgres".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert_eq!(" Memory ".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("mongo".parse::<StorageBackend>().is_err());
    }
}
