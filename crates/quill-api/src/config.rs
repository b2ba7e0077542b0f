// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use quill_config::{CorsConfig, QuillConfig};
use serde::{Deserialize, Serialize};

use crate::auth::JwtConfig;

// =============================================================================
// ApiConfig
// =============================================================================

/// Configuration for the API server.
///
/// Usually derived from the loaded [`QuillConfig`] via [`ApiConfig::from_quill`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind to.
    pub bind_address: IpAddr,
    /// Server port.
    pub port: u16,
    /// Prefix for every API route. `/health` stays at the root.
    pub base_path: String,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// bcrypt work factor for new hashes.
    pub bcrypt_cost: u32,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: quill_config::schema::DEFAULT_PORT,
            base_path: quill_config::schema::DEFAULT_BASE_PATH.to_string(),
            cors: CorsConfig::default(),
            jwt: JwtConfig::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            request_timeout: Duration::from_secs(30),
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the process configuration onto the server settings.
    pub fn from_quill(config: &QuillConfig) -> Self {
        let mut jwt = JwtConfig::new(config.auth.jwt_secret.expose());
        jwt.expiration_secs = config.auth.token_ttl_secs;
        jwt.issuer = config.auth.issuer.clone();

        Self {
            bind_address: config.server.bind_address,
            port: config.server.port,
            base_path: config.server.base_path.clone(),
            cors: config.server.cors.clone(),
            jwt,
            bcrypt_cost: config.auth.bcrypt_cost,
            request_timeout: config.server.request_timeout(),
            max_body_size: config.server.max_body_size,
        }
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Sets the bind address.
    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the base path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the JWT configuration.
    pub fn with_jwt(mut self, jwt: JwtConfig) -> Self {
        self.jwt = jwt;
        self
    }

    /// Sets the bcrypt cost.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Sets the CORS configuration.
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Base path with any trailing slash removed. Empty means "mount at root".
    pub fn normalized_base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::SecretValue;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3003);
        assert_eq!(config.base_path, "/api/v1");
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig::default().with_port(9000);
        assert_eq!(config.socket_addr().port(), 9000);
    }

    #[test]
    fn test_from_quill() {
        let mut quill = QuillConfig::default();
        quill.server.port = 4000;
        quill.auth.jwt_secret = SecretValue::new("from-config-secret");
        quill.auth.token_ttl_secs = 600;
        quill.auth.bcrypt_cost = 6;

        let config = ApiConfig::from_quill(&quill);
        assert_eq!(config.port, 4000);
        assert_eq!(config.jwt.secret, "from-config-secret");
        assert_eq!(config.jwt.expiration_secs, 600);
        assert_eq!(config.bcrypt_cost, 6);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3001"]);
    }

    #[test]
    fn test_normalized_base_path() {
        assert_eq!(ApiConfig::default().with_base_path("/api/v1/").normalized_base_path(), "/api/v1");
        assert_eq!(ApiConfig::default().with_base_path("/").normalized_base_path(), "");
    }
}
