// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing.
//!
//! bcrypt only looks at the first 72 bytes of its input, so longer passwords
//! are refused up front instead of being silently truncated.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use once_cell::sync::OnceCell;
use thiserror::Error;

/// Longest password bcrypt can digest without truncation.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Failure inside the hashing machinery.
#[derive(Debug, Error)]
pub enum HashError {
    /// bcrypt or the blocking pool failed.
    #[error("password hashing failed: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// A stored hash could not be parsed.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash {
        /// Error message.
        message: String,
    },
}

impl HashError {
    fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Rejection of a plaintext password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The password exceeds bcrypt's input limit.
    #[error("password must be at most {max} bytes")]
    TooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },

    /// Hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// bcrypt hasher with a fixed work factor.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    /// Creates a hasher at bcrypt's default cost.
    pub fn new() -> Self {
        Self {
            cost: DEFAULT_COST,
            dummy: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a hasher with an explicit cost (4..=31).
    pub fn with_cost(cost: u32) -> Result<Self, HashError> {
        if !(4..=31).contains(&cost) {
            return Err(HashError::internal(format!(
                "bcrypt cost {} is outside 4..=31",
                cost
            )));
        }
        Ok(Self {
            cost,
            dummy: Arc::new(OnceCell::new()),
        })
    }

    /// Work factor in use.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `plaintext` with a fresh salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }
        hash(plaintext, self.cost).map_err(|e| HashError::internal(e.to_string()).into())
    }

    /// Checks `plaintext` against a stored hash.
    ///
    /// Over-length input can never match since it could not have been hashed.
    pub fn verify(&self, plaintext: &str, stored: &str) -> Result<bool, HashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        verify(plaintext, stored).map_err(|e| HashError::MalformedHash {
            message: e.to_string(),
        })
    }

    /// Burns the same work as a real verification and always reports a mismatch.
    pub fn verify_dummy(&self, plaintext: &str) -> Result<bool, HashError> {
        let dummy = self.dummy.get_or_try_init(|| {
            hash("quill-dummy-password", self.cost).map_err(|e| HashError::internal(e.to_string()))
        })?;
        self.verify(plaintext, dummy).map(|_| false)
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_async(&self, plaintext: String) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| HashError::internal(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_async(&self, plaintext: String, stored: String) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored))
            .await
            .map_err(|e| HashError::internal(e.to_string()))?
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking pool.
    pub async fn verify_dummy_async(&self, plaintext: String) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&plaintext))
            .await
            .map_err(|e| HashError::internal(e.to_string()))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}
