// src/config/mod.rs

use once_cell::sync::Lazy;
use std::str::FromStr;

/// Environment-driven configuration, consumed by `main` only. Stores take
/// explicit pools and paths so tests never read the process environment.
#[derive(Debug, Clone)]
pub struct VerihubConfig {
    // ── Database Configuration
    pub database_url: String,

    // ── Storage Configuration
    /// Root under which every project's working directory lives.
    pub projects_dir: String,
    pub migrations_dir: String,

    // ── Server Configuration
    pub host: String,
    pub port: u16,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {key} = '{val}' (parse failed, using default)");
                default
            }
        },
        Err(_) => default,
    }
}

impl VerihubConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            database_url: env_var_or("DATABASE_URL", "sqlite:./verihub.db".to_string()),
            projects_dir: env_var_or("VERIHUB_PROJECTS_DIR", "./projects".to_string()),
            migrations_dir: env_var_or("VERIHUB_MIGRATIONS_DIR", "./migrations".to_string()),
            host: env_var_or("VERIHUB_HOST", "0.0.0.0".to_string()),
            port: env_var_or("VERIHUB_PORT", 3001),
        }
    }
}

pub static CONFIG: Lazy<VerihubConfig> = Lazy::new(VerihubConfig::from_env);
