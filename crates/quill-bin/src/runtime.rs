// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Startup order: configuration, store, API state, optional admin seed,
//! signal listener, HTTP server. Shutdown drains the server and then closes
//! the store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use quill_api::{ApiConfig, ApiServer, ApiServerBuilder, AppState, Role};
use quill_config::{ConfigLoader, QuillConfig};
use quill_core::model::NewUser;
use quill_core::Store;

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

/// Environment variable holding the seeded admin's user name.
pub const ADMIN_USER_ENV: &str = "QUILL_ADMIN_USER";
/// Environment variable holding the seeded admin's password.
pub const ADMIN_PASSWORD_ENV: &str = "QUILL_ADMIN_PASSWORD";
/// Environment variable holding the seeded admin's email.
pub const ADMIN_EMAIL_ENV: &str = "QUILL_ADMIN_EMAIL";

/// Loads the configuration from `path`, falling back to defaults plus
/// environment when the file does not exist.
pub fn load_runtime_config(path: &Path) -> BinResult<QuillConfig> {
    ConfigLoader::new()
        .load_optional(Some(path))
        .map_err(|e| BinError::from(e).with_context(format!("loading {}", path.display())))
}

// =============================================================================
// QuillRuntime
// =============================================================================

/// Owns the configuration and the shutdown coordinator for one server run.
pub struct QuillRuntime {
    config: Arc<QuillConfig>,
    shutdown: ShutdownCoordinator,
    admin_seed: Option<AdminSeed>,
}

impl QuillRuntime {
    /// Creates a new runtime.
    pub fn new(config: QuillConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
            admin_seed: None,
        }
    }

    /// Seeds an approved Admin account before serving.
    pub fn with_admin_seed(mut self, seed: AdminSeed) -> Self {
        self.admin_seed = Some(seed);
        self
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Returns the configuration.
    pub fn config(&self) -> &QuillConfig {
        &self.config
    }

    /// Opens the store and assembles the API server.
    pub async fn build_server(&self) -> BinResult<ApiServer> {
        let store = Store::connect(&self.config.storage)
            .map_err(|e| BinError::from(e).with_context("opening store"))?;

        let server = ApiServerBuilder::new()
            .config(ApiConfig::from_quill(&self.config))
            .store(store)
            .build()
            .map_err(|e| BinError::from(e).with_context("building API state"))?;

        if let Some(seed) = &self.admin_seed {
            seed.apply(server.state()).await?;
        }

        Ok(server)
    }

    /// Runs the server until an OS signal or a manual shutdown request.
    pub async fn run(self) -> BinResult<()> {
        info!(version = quill_core::VERSION, "Starting Quill");

        let server = self.build_server().await?;
        let store = server.state().store().clone();

        let signals = self.shutdown.listen_for_signals();
        let result = server
            .run_with_shutdown(self.shutdown.shutdown_signal().wait())
            .await;
        signals.abort();

        store.close().await;
        info!("Quill shutdown complete");

        result.map_err(BinError::from)
    }
}

// =============================================================================
// Admin seeding
// =============================================================================

/// An approved Admin account created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    /// Login name.
    pub user_name: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Contact address.
    pub email: String,
}

impl AdminSeed {
    /// Reads the seed from `QUILL_ADMIN_USER`, `QUILL_ADMIN_PASSWORD` and the
    /// optional `QUILL_ADMIN_EMAIL`.
    pub fn from_env() -> BinResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BinResult<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BinError::config(format!("{} must be set to seed an admin", name)))
        };

        let user_name = required(ADMIN_USER_ENV)?;
        let password = required(ADMIN_PASSWORD_ENV)?;
        let email = lookup(ADMIN_EMAIL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("{}@localhost", user_name));

        Ok(Self {
            user_name,
            password,
            email,
        })
    }

    /// Inserts the account unless the user name is already taken.
    ///
    /// Returns `true` when a new account was created.
    pub async fn apply(&self, state: &AppState) -> BinResult<bool> {
        let users = state.store().users();
        if users.find_user_by_name(&self.user_name).await?.is_some() {
            info!(user_name = %self.user_name, "Admin account already present, not seeding");
            return Ok(false);
        }

        let password_hash = state
            .hasher
            .hash_async(self.password.clone())
            .await
            .map_err(|e| BinError::init(format!("Failed to hash admin password: {}", e)))?;

        let user = users
            .insert_user(NewUser {
                user_name: self.user_name.clone(),
                user_email: self.email.clone(),
                password_hash,
                role: Role::Admin.as_str().to_string(),
                approved: true,
                verify_code: None,
                verify_expires: None,
            })
            .await?;

        warn!(user_id = %user.id, user_name = %user.user_name, "Seeded Admin account");
        Ok(true)
    }
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<QuillConfig>,
    admin_seed: Option<AdminSeed>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: QuillConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seeds an admin account at startup.
    pub fn admin_seed(mut self, seed: AdminSeed) -> Self {
        self.admin_seed = Some(seed);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<QuillRuntime> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;
                load_runtime_config(&path)?
            }
        };

        let runtime = QuillRuntime::new(config);
        Ok(match self.admin_seed {
            Some(seed) => runtime.with_admin_seed(seed),
            None => runtime,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::SecretValue;
    use std::collections::HashMap;
    use std::time::Duration;

    fn test_config() -> QuillConfig {
        let mut config = QuillConfig::default();
        config.auth.jwt_secret = SecretValue::new("runtime-test-secret");
        config.auth.bcrypt_cost = 4;
        config.server.bind_address = "127.0.0.1".parse().unwrap();
        config
    }

    fn seed() -> AdminSeed {
        AdminSeed {
            user_name: "root".to_string(),
            password: "hunter22".to_string(),
            email: "root@example.com".to_string(),
        }
    }

    #[test]
    fn test_runtime_builder_requires_config() {
        assert!(RuntimeBuilder::new().build().is_err());
    }

    #[test]
    fn test_runtime_builder_validates_config() {
        let err = RuntimeBuilder::new()
            .config(QuillConfig::default())
            .build()
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 1);

        assert!(RuntimeBuilder::new().config(test_config()).build().is_ok());
    }

    #[test]
    fn test_admin_seed_from_lookup() {
        let env: HashMap<&str, &str> =
            [(ADMIN_USER_ENV, "root"), (ADMIN_PASSWORD_ENV, "pw")].into();
        let seed = AdminSeed::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(seed.user_name, "root");
        assert_eq!(seed.email, "root@localhost");

        let missing = AdminSeed::from_lookup(|_| None).unwrap_err();
        assert!(missing.to_string().contains(ADMIN_USER_ENV));
    }

    #[test]
    fn test_admin_seed_debug_hides_password() {
        assert!(!format!("{:?}", seed()).contains("hunter22"));
    }

    #[tokio::test]
    async fn test_admin_seed_creates_approved_admin_once() {
        let runtime = RuntimeBuilder::new()
            .config(test_config())
            .admin_seed(seed())
            .build()
            .unwrap();
        let server = runtime.build_server().await.unwrap();
        let state = server.state();

        let user = state
            .store()
            .users()
            .find_user_by_name("root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, "Admin");
        assert!(user.approved);
        assert_ne!(user.password_hash, "hunter22");

        assert!(!seed().apply(state).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_stops_on_manual_shutdown() {
        let mut config = test_config();
        config.server.port = 0;
        let runtime = QuillRuntime::new(config);
        let shutdown = runtime.shutdown().clone();

        let handle = tokio::spawn(runtime.run());
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.initiate_shutdown("test");

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("runtime should stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
