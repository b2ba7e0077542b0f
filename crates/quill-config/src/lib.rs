// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-config
//!
//! Configuration management for the Quill blog backend.
//!
//! ## Features
//!
//! - **Schema Definition**: server, auth, storage and logging sections with defaults
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `QUILL_*` variables plus the unprefixed `PORT`,
//!   `JWT_SECRET` and `DATABASE_URL`
//! - **Secret Redaction**: the signing secret never reaches logs or dumps
//!
//! ## Quick Start
//!
//! ```no_run
//! use quill_config::loader::load_config;
//!
//! let config = load_config("quill.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! auth:
//!   jwt_secret: "${JWT_SECRET}"
//! storage:
//!   database: "${MONGO_DATABASE:edandlinda}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    AuthConfig, CorsConfig, LogFormat, LogLevel, LoggingConfig, QuillConfig, SecretValue,
    ServerConfig, StorageConfig, StorageKind,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
