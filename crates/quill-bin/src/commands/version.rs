// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints crate versions and build target.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Quill - blog backend with JWT auth and role-gated routes");
    println!();
    println!("Version Information:");
    println!("  quill-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  quill-core:   {}", quill_core::VERSION);
    println!("  quill-api:    {}", quill_api::VERSION);
    println!("  quill-config: {}", quill_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
