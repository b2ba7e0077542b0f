// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types shared by the persistence and notification layers.
//!
//! # Error Hierarchy
//!
//! ```text
//! StoreError   - persistence lookups and writes
//! NotifyError  - outbound message delivery
//! ```
//!
//! The API layer maps these onto HTTP responses; nothing in this crate knows
//! about status codes beyond the `is_not_found` / `is_conflict` predicates.

use thiserror::Error;

// =============================================================================
// StoreError
// =============================================================================

/// Errors returned by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("user", "blog", "comment").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("{message}")]
    Conflict {
        /// Human-readable description of the clash.
        message: String,
    },

    /// An identifier could not be parsed.
    #[error("Invalid {entity} ID: {value}")]
    InvalidId {
        /// Entity kind.
        entity: &'static str,
        /// The raw value.
        value: String,
    },

    /// The backend is not reachable or has been closed.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// Any other backend failure.
    #[error("Backend error: {message}")]
    Backend {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an invalid id error.
    pub fn invalid_id(entity: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            entity,
            value: value.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` for missing records.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. } | StoreError::InvalidId { .. })
    }

    /// Returns `true` for uniqueness violations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Returns the error type for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::Conflict { .. } => "conflict",
            StoreError::InvalidId { .. } => "invalid_id",
            StoreError::Unavailable { .. } => "unavailable",
            StoreError::Backend { .. } => "backend",
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// NotifyError
// =============================================================================

/// Errors returned by a [`Notifier`](crate::notify::Notifier).
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message was rejected before sending.
    #[error("Invalid message: {message}")]
    InvalidMessage {
        /// Error message.
        message: String,
    },

    /// Delivery failed.
    #[error("Delivery to '{recipient}' failed: {message}")]
    DeliveryFailed {
        /// Recipient address.
        recipient: String,
        /// Error message.
        message: String,
    },
}

impl NotifyError {
    /// Creates an invalid message error.
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    /// Creates a delivery failure.
    pub fn delivery_failed(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            recipient: recipient.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_predicates() {
        assert!(StoreError::not_found("blog", "abc").is_not_found());
        assert!(StoreError::invalid_id("blog", "zzz").is_not_found());
        assert!(StoreError::conflict("username already in use").is_conflict());
        assert!(!StoreError::backend("boom").is_conflict());
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::not_found("comment", "42");
        assert_eq!(err.to_string(), "comment not found: 42");

        let err = StoreError::conflict("email already in use");
        assert_eq!(err.to_string(), "email already in use");
        assert_eq!(err.error_type(), "conflict");
    }

    #[test]
    fn test_notify_error_display() {
        let err = NotifyError::delivery_failed("a@example.com", "smtp down");
        assert_eq!(err.to_string(), "Delivery to 'a@example.com' failed: smtp down");
    }
}
