// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use tracing::info;

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::{load_runtime_config, AdminSeed, RuntimeBuilder};

/// Loads configuration, starts logging and serves until shutdown.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    let config = load_runtime_config(&cli.config)?;
    init_logging(
        &cli.effective_log_level(&config.logging),
        cli.effective_log_format(&config.logging),
    )?;

    info!(config = %cli.config.display(), "Configuration loaded");

    let mut builder = RuntimeBuilder::new().config(config);
    if args.seed_admin {
        builder = builder.admin_seed(AdminSeed::from_env()?);
    }

    builder.build()?.run().await
}
