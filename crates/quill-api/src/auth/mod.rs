// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Password hashing (bcrypt)
//! - JWT token signing and verification
//! - Token issuance against a credential store
//! - The role registry and the per-request authentication context

mod claims;
mod context;
mod issuer;
mod jwt;
pub mod password;
mod role;

pub use claims::Claims;
pub use context::AuthContext;
pub use issuer::{IssuedToken, TokenIssuer, INVALID_CREDENTIALS, NOT_APPROVED};
pub use jwt::{JwtConfig, JwtManager, HMAC_ALGORITHMS, INVALID_TOKEN};
pub use password::{HashError, PasswordError, PasswordHasher};
pub use role::Role;
