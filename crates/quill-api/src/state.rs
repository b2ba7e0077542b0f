// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use quill_core::{LogNotifier, Notifier, Store};

use crate::auth::{JwtManager, PasswordHasher, TokenIssuer};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Everything here is built once at startup and cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Persistence handle.
    pub store: Store,
    /// Token signer and verifier.
    pub jwt_manager: JwtManager,
    /// Password hasher.
    pub hasher: PasswordHasher,
    /// Login path.
    pub issuer: TokenIssuer,
    /// Outbound mail.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the JWT manager.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Returns the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("jwt_manager", &self.jwt_manager)
            .field("hasher", &self.hasher)
            .field("notifier", &self.notifier.name())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    store: Option<Store>,
    jwt_manager: Option<JwtManager>,
    hasher: Option<PasswordHasher>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the store. Defaults to a fresh in-memory store.
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the JWT manager. Defaults to one built from `config.jwt`.
    pub fn jwt_manager(mut self, manager: JwtManager) -> Self {
        self.jwt_manager = Some(manager);
        self
    }

    /// Sets the hasher. Defaults to `config.bcrypt_cost`.
    pub fn hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the notifier. Defaults to [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails if the JWT configuration is unusable (empty secret, non-HMAC
    /// algorithm) or the bcrypt cost is out of range.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let jwt_manager = match self.jwt_manager {
            Some(manager) => manager,
            None => JwtManager::new(config.jwt.clone())?,
        };

        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => PasswordHasher::with_cost(config.bcrypt_cost)
                .map_err(|e| ApiError::internal(format!("Invalid bcrypt cost: {}", e)))?,
        };

        let store = self.store.unwrap_or_else(Store::memory);
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(LogNotifier) as Arc<dyn Notifier>);
        let issuer = TokenIssuer::new(store.credentials(), hasher.clone(), jwt_manager.clone());

        Ok(AppState {
            config: Arc::new(config),
            store,
            jwt_manager,
            hasher,
            issuer,
            notifier,
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for JwtManager {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_manager.clone()
    }
}

impl axum::extract::FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
