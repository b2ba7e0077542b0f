// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use quill_config::{QuillConfig, StorageKind};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::load_runtime_config;

/// Shortest signing secret that does not produce a warning.
const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Loads the configuration the way `run` would and reports the outcome.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = match load_runtime_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            if args.format == OutputFormat::Json {
                let output = serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "error": e.to_string(),
                });
                println!("{}", to_pretty(&output));
            }
            return Err(e);
        }
    };

    let mut warnings = collect_warnings(&config);
    if !config_path.exists() {
        warnings.insert(
            0,
            format!(
                "Configuration file not found: {} (defaults and environment used)",
                config_path.display()
            ),
        );
    }

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!(
                "  Listen:    {}:{}",
                config.server.bind_address, config.server.port
            );
            println!("  Base path: {}", config.server.base_path);
            println!("  Origins:   {}", config.server.cors.allowed_origins.join(", "));
            println!("  Token TTL: {}s", config.auth.token_ttl_secs);
            println!("  Storage:   {:?} ({})", config.storage.backend, config.storage.database);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Effective configuration:");
                let rendered = serde_yaml::to_string(&config)
                    .map_err(|e| BinError::runtime(format!("Failed to render config: {}", e)))?;
                println!("{}", rendered);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "bind_address": config.server.bind_address.to_string(),
                    "port": config.server.port,
                    "base_path": config.server.base_path,
                    "allowed_origins": config.server.cors.allowed_origins,
                    "token_ttl_secs": config.auth.token_ttl_secs,
                    "storage_database": config.storage.database,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", to_pretty(&output));
        }
    }

    Ok(())
}

/// Non-fatal problems in an otherwise valid configuration.
fn collect_warnings(config: &QuillConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.auth.jwt_secret.expose().len() < RECOMMENDED_SECRET_BYTES {
        warnings.push(format!(
            "auth.jwt_secret is shorter than {} bytes",
            RECOMMENDED_SECRET_BYTES
        ));
    }

    if config.storage.backend == StorageKind::Memory && config.storage.url.is_some() {
        warnings.push("storage.url is ignored by the memory backend".to_string());
    }

    if config.storage.backend == StorageKind::Memory {
        warnings.push("memory storage does not survive restarts".to_string());
    }

    if config.server.cors.allowed_origins.is_empty() {
        warnings.push("server.cors.allowed_origins is empty; browsers will be refused".to_string());
    }

    warnings
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
