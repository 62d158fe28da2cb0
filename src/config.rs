use std::env;
use anyhow::{Context, Result, bail};

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Clone)]
pub struct Config {
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
    pub api_base: String,
    pub list_concurrency: usize,
    pub service_port: u16,
    pub service_host: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                Some(_) => bail!("{} environment variable must not be empty", name),
                None => bail!("{} environment variable is required", name),
            }
        };

        let account_id = required("CLOUDFLARE_ACCOUNT_ID")?;
        let namespace_id = required("CLOUDFLARE_KV_NAMESPACE_ID")?;
        let api_token = required("CLOUDFLARE_API_TOKEN")?;

        let api_base = lookup("CLOUDFLARE_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let list_concurrency = lookup("KV_LIST_CONCURRENCY")
            .unwrap_or_else(|| "0".to_string())
            .parse::<usize>()
            .context("KV_LIST_CONCURRENCY must be a non-negative integer")?;

        let service_port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let static_dir = lookup("STATIC_DIR")
            .unwrap_or_else(|| "public".to_string());

        Ok(Config {
            account_id,
            namespace_id,
            api_token,
            api_base,
            list_concurrency,
            service_port,
            service_host,
            static_dir,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Cloudflare API: {}", self.api_base);
        tracing::info!("  Account id: {}", self.account_id);
        tracing::info!("  KV namespace id: {}", self.namespace_id);
        tracing::info!("  API token set: {}", !self.api_token.is_empty());
        if self.list_concurrency == 0 {
            tracing::info!("  List fan-out: unbounded");
        } else {
            tracing::info!("  List fan-out: {} concurrent fetches", self.list_concurrency);
        }
        tracing::info!("  Static files: {}", self.static_dir);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        account_id: "test-account".to_string(),
        namespace_id: "test-namespace".to_string(),
        api_token: "test-token".to_string(),
        api_base: DEFAULT_API_BASE.to_string(),
        list_concurrency: 0,
        service_port: 3000,
        service_host: "127.0.0.1".to_string(),
        static_dir: "public".to_string(),
    }
}
