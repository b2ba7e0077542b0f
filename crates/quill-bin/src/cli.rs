// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate the configuration
//! - `version`: Show version information
//! - `hash-password`: Print a bcrypt hash for seeding accounts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quill_config::{LogFormat, LogLevel, LoggingConfig};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Quill - blog backend with JWT authentication and role-gated routes.
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    author = "Sylvex <contact@sylvex.io>",
    version = quill_core::VERSION,
    about = "Blog REST backend with JWT auth and role-gated access",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path. A missing file means defaults plus environment.
    #[arg(
        short,
        long,
        default_value = "quill.yaml",
        env = "QUILL_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format. Overrides the config file.
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<CliLogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Validate the configuration
    ///
    /// Loads the configuration the same way `run` does, applies environment
    /// overrides and reports problems without starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Print a bcrypt hash of a password
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Create an approved Admin account from QUILL_ADMIN_USER and
    /// QUILL_ADMIN_PASSWORD before serving
    #[arg(long)]
    pub seed_admin: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show the effective configuration (secrets redacted)
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,

    /// bcrypt cost (4..=31); defaults to 12
    #[arg(long)]
    pub cost: Option<u32>,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<CliLogFormat> for LogFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Text => LogFormat::Text,
            CliLogFormat::Json => LogFormat::Json,
            CliLogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Resolves the log level: `-q`/`-v`, then `--log-level`, then the config.
    pub fn effective_log_level(&self, configured: &LoggingConfig) -> String {
        if self.quiet {
            LogLevel::Warn.as_str().to_string()
        } else if self.verbose {
            LogLevel::Debug.as_str().to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| configured.level.as_str().to_string())
        }
    }

    /// Resolves the log format: `--log-format`, then the config.
    pub fn effective_log_format(&self, configured: &LoggingConfig) -> LogFormat {
        self.log_format.map(LogFormat::from).unwrap_or(configured.format)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["quill"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
    }

    #[test]
    fn test_run_seed_admin() {
        let cli = Cli::parse_from(["quill", "run", "--seed-admin"]);
        match cli.command {
            Some(Commands::Run(args)) => assert!(args.seed_admin),
            other => panic!("Expected Run command, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["quill", "validate", "--show-config", "--format", "json"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["quill", "-c", "/etc/quill/config.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/quill/config.yaml"));
    }

    #[test]
    fn test_log_level_precedence() {
        let configured = LoggingConfig::default();

        let cli = Cli::parse_from(["quill"]);
        assert_eq!(cli.effective_log_level(&configured), configured.level.as_str());

        let cli = Cli::parse_from(["quill", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(&configured), "trace");

        let cli = Cli::parse_from(["quill", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(&configured), "warn");

        let cli = Cli::parse_from(["quill", "-v"]);
        assert!(cli.is_verbose());
        assert_eq!(cli.effective_log_level(&configured), "debug");
    }

    #[test]
    fn test_log_format_override() {
        let configured = LoggingConfig::default();
        let cli = Cli::parse_from(["quill", "--log-format", "json"]);
        assert_eq!(cli.effective_log_format(&configured), LogFormat::Json);
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["quill", "hash-password", "s3cret", "--cost", "4"]);
        if let Some(Commands::HashPassword(args)) = cli.command {
            assert_eq!(args.password.as_deref(), Some("s3cret"));
            assert_eq!(args.cost, Some(4));
        } else {
            panic!("Expected HashPassword command");
        }

        assert!(Cli::try_parse_from(["quill", "hash-password"]).is_err());
    }
}
