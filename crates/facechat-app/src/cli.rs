//! CLI argument definitions for the facechat relay binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use facechat_core::config::FacechatConfig;

/// Facechat chat relay: forwards browser chat messages to the inference backend.
#[derive(Parser, Debug, Default)]
#[command(name = "facechat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Relay listen port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Relay listen interface.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Base URL of the inference backend.
    #[arg(short = 'u', long = "upstream-url")]
    pub upstream_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > FACECHAT_CONFIG env var > ~/.facechat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("FACECHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the relay port.
    ///
    /// Priority: --port flag > FACECHAT_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        let env = std::env::var("FACECHAT_PORT").ok();
        pick_port(self.port, env.as_deref(), config_port)
    }

    /// Resolve the inference backend URL.
    ///
    /// Priority: --upstream-url flag > FACECHAT_UPSTREAM_URL env var > config file value.
    pub fn resolve_upstream_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.upstream_url {
            return url.clone();
        }
        match std::env::var("FACECHAT_UPSTREAM_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => config_url.to_string(),
        }
    }

    /// Apply every override to a loaded configuration.
    pub fn apply(&self, config: &mut FacechatConfig) {
        config.relay.port = self.resolve_port(config.relay.port);
        config.relay.upstream_url = self.resolve_upstream_url(&config.relay.upstream_url);
        if let Some(ref host) = self.host {
            config.relay.host = host.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file.
    File,
    /// No file at the path. Defaults are used.
    Missing,
    /// The file exists but could not be read or parsed. Defaults are used.
    Invalid(String),
}

/// Load the configuration file, falling back to defaults.
///
/// Runs before logging is initialised, so it reports the outcome instead of
/// logging it.
pub fn load_config(path: &Path) -> (FacechatConfig, ConfigSource) {
    if !path.exists() {
        return (FacechatConfig::default(), ConfigSource::Missing);
    }
    match FacechatConfig::load(path) {
        Ok(config) => (config, ConfigSource::File),
        Err(e) => (FacechatConfig::default(), ConfigSource::Invalid(e.to_string())),
    }
}

fn pick_port(flag: Option<u16>, env: Option<&str>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.and_then(|v| v.parse::<u16>().ok()) {
        return p;
    }
    config_port
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".facechat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".facechat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
