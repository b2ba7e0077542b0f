// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing for Quill.
//!
//! # Loading Pipeline
//!
//! 1. Read the YAML/TOML/JSON file (or start from defaults when there is none)
//! 2. Resolve `${VAR}` and `${VAR:default}` placeholders
//! 3. Parse into [`QuillConfig`]
//! 4. Apply environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! QUILL_SERVER_PORT=8080
//! QUILL_AUTH_JWT_SECRET=change-me
//! QUILL_STORAGE_DATABASE=blog
//! ```
//!
//! The unprefixed `PORT`, `JWT_SECRET`, `DATABASE_URL` and `MONGO_DATABASE`
//! are honoured too. Prefixed variables win when both are set. Empty values
//! count as unset.

use std::env;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, QuillConfig, SecretValue};

type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Quill.
///
/// # Examples
///
/// ```no_run
/// use quill_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("quill.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables in values.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "QUILL".to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is chosen by extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<QuillConfig> {
        self.load_with(path.as_ref(), &process_env)
    }

    /// Loads configuration from `path` if it exists, otherwise from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_optional(&self, path: Option<&Path>) -> ConfigResult<QuillConfig> {
        match path {
            Some(path) if path.exists() => self.load(path),
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Config file not found, using defaults and environment"
                );
                self.load_defaults_with(&process_env)
            }
            None => {
                debug!("No config file given, using defaults and environment");
                self.load_defaults_with(&process_env)
            }
        }
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<QuillConfig> {
        self.load_str_with(content, format, &process_env)
    }

    fn load_with(&self, path: &Path, lookup: EnvLookup<'_>) -> ConfigResult<QuillConfig> {
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let format = ConfigFormat::from_path(path)?;

        let config = self
            .load_str_with(&content, format, lookup)
            .map_err(|e| match e {
                ConfigError::Serialization { message } => ConfigError::parse(path, message),
                other => other,
            })?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn load_str_with(
        &self,
        content: &str,
        format: ConfigFormat,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<QuillConfig> {
        let content = if self.resolve_env_vars {
            resolve_env_placeholders(content, lookup)
        } else {
            content.to_string()
        };

        let mut config: QuillConfig = parse_str(&content, format)?;
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, lookup)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn load_defaults_with(&self, lookup: EnvLookup<'_>) -> ConfigResult<QuillConfig> {
        let mut config = QuillConfig::default();
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, lookup)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(
        &self,
        config: &mut QuillConfig,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<()> {
        let prefixed = |key: &str| format!("{}_{}", self.env_prefix, key);

        // Unprefixed names first so prefixed ones take precedence.
        for name in ["PORT".to_string(), prefixed("SERVER_PORT")] {
            if let Some(value) = lookup(&name) {
                config.server.port = value
                    .parse()
                    .map_err(|_| ConfigError::invalid_env_var(&name, "expected valid port number"))?;
            }
        }
        let name = prefixed("SERVER_BIND_ADDRESS");
        if let Some(value) = lookup(&name) {
            config.server.bind_address = value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected IP address"))?;
        }
        if let Some(value) = lookup(&prefixed("SERVER_BASE_PATH")) {
            config.server.base_path = value;
        }
        if let Some(value) = lookup(&prefixed("SERVER_CORS_ORIGINS")) {
            config.server.cors.allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        for name in ["JWT_SECRET".to_string(), prefixed("AUTH_JWT_SECRET")] {
            if let Some(value) = lookup(&name) {
                config.auth.jwt_secret = SecretValue::new(value);
            }
        }
        let name = prefixed("AUTH_TOKEN_TTL_SECS");
        if let Some(value) = lookup(&name) {
            config.auth.token_ttl_secs = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected number of seconds"))?;
        }
        let name = prefixed("AUTH_BCRYPT_COST");
        if let Some(value) = lookup(&name) {
            config.auth.bcrypt_cost = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected number"))?;
        }

        for name in ["DATABASE_URL".to_string(), prefixed("STORAGE_URL")] {
            if let Some(value) = lookup(&name) {
                config.storage.url = Some(value);
            }
        }
        for name in ["MONGO_DATABASE".to_string(), prefixed("STORAGE_DATABASE")] {
            if let Some(value) = lookup(&name) {
                config.storage.database = value;
            }
        }

        let name = prefixed("LOG_LEVEL");
        if let Some(value) = lookup(&name) {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!(var = %name, value = %value, "Ignoring unknown log level"),
            }
        }
        let name = prefixed("LOG_FORMAT");
        if let Some(value) = lookup(&name) {
            match parse_log_format(&value) {
                Some(format) => config.logging.format = format,
                None => warn!(var = %name, value = %value, "Ignoring unknown log format"),
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        // An empty YAML document is null; treat it as an empty mapping.
        ConfigFormat::Yaml if content.trim().is_empty() => {
            serde_yaml::from_str("{}").map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
///
/// Unknown variables without a default are kept verbatim.
fn resolve_env_placeholders(content: &str, lookup: EnvLookup<'_>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (lookup(var_name), default_value) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str(&format!("${{{}}}", var_name));
            }
        }
    }

    result
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "compact" => Some(LogFormat::Compact),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<QuillConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<QuillConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================
