//! Runtime configuration read from environment variables.

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing::info;

pub const HOST_VAR: &str = "REGISTRATION_HOST";
pub const PORT_VAR: &str = "REGISTRATION_PORT";
pub const DATA_DIR_VAR: &str = "REGISTRATION_DATA_DIR";
pub const ALLOWED_ORIGINS_VAR: &str = "REGISTRATION_ALLOWED_ORIGINS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:4200,http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Root of the record store; one subdirectory per collection
    pub data_dir: PathBuf,
    /// Origins the CORS layer lets through
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origins: String = load(&lookup, ALLOWED_ORIGINS_VAR, DEFAULT_ALLOWED_ORIGINS)?;
        let allowed_origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: load(&lookup, HOST_VAR, DEFAULT_HOST)?,
            port: load(&lookup, PORT_VAR, DEFAULT_PORT)?,
            data_dir: load(&lookup, DATA_DIR_VAR, DEFAULT_DATA_DIR)?,
            allowed_origins,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}
