// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-bin
//!
//! CLI binary for the Quill blog backend.
//!
//! - CLI argument parsing with clap
//! - Runtime orchestration (config, store, API server)
//! - Graceful shutdown on SIGTERM / SIGINT
//! - Logging initialization
//!
//! ## Architecture
//!
//! ```text
//!                main.rs
//!                   │
//!                cli.rs
//!                   │
//!        ┌──────────┼──────────┐
//!        ▼          ▼          ▼
//!    commands    runtime    logging
//!                   │
//!                shutdown
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! quill
//!
//! # Start with a custom config and seed an admin account
//! QUILL_ADMIN_USER=root QUILL_ADMIN_PASSWORD=... quill -c /etc/quill/quill.yaml run --seed-admin
//!
//! # Validate configuration
//! quill validate --show-config
//!
//! # Hash a password
//! quill hash-password --stdin
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{AdminSeed, QuillRuntime, RuntimeBuilder};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
