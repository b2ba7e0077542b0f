// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance on the login path.

use std::sync::Arc;

use quill_core::CredentialStore;
use tracing::debug;

use super::{Claims, JwtManager, PasswordHasher};
use crate::error::{ApiError, ApiResult, ValidationErrors};

/// Returned for unknown users and wrong passwords alike.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Returned when the password is right but the account awaits approval.
pub const NOT_APPROVED: &str = "account not approved";

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS.
    pub access_token: String,
    /// The claims inside it.
    pub claims: Claims,
}

/// Exchanges a username and password for a signed token.
#[derive(Clone)]
pub struct TokenIssuer {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt: JwtManager,
}

impl TokenIssuer {
    /// Creates an issuer.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt: JwtManager,
    ) -> Self {
        Self {
            credentials,
            hasher,
            jwt,
        }
    }

    /// Authenticates `username` / `password` and signs a token.
    ///
    /// Unknown users and wrong passwords produce the same error after the
    /// same amount of bcrypt work. Has no side effects.
    pub async fn issue_token(&self, username: &str, password: &str) -> ApiResult<IssuedToken> {
        let mut errors = ValidationErrors::new();
        errors.require_present("user_name", username, "Username is required");
        errors.require_present("user_password", password, "Password is required");
        errors.into_result(())?;

        let credential = match self.credentials.find_by_username(username).await? {
            Some(credential) => credential,
            None => {
                self.hasher.verify_dummy_async(password.to_string()).await?;
                debug!(username = %username, "Login rejected: unknown user");
                return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let matches = self
            .hasher
            .verify_async(password.to_string(), credential.password_hash.clone())
            .await?;
        if !matches {
            debug!(user_id = %credential.user_id, "Login rejected: wrong password");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        if !credential.approved {
            debug!(user_id = %credential.user_id, "Login rejected: account not approved");
            return Err(ApiError::unauthorized(NOT_APPROVED));
        }

        let (access_token, claims) = self.jwt.create_access_token(
            &credential.user_id.to_string(),
            &credential.username,
            &credential.role,
        )?;

        Ok(IssuedToken {
            access_token,
            claims,
        })
    }

    /// The hasher used for verification.
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// The token signer.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("hasher", &self.hasher)
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, Role};
    use async_trait::async_trait;
    use quill_core::{Credential, StoreError, StoreResult, UserId};
    use std::collections::HashMap;

    struct FixedCredentials(HashMap<String, Credential>);

    #[async_trait]
    impl CredentialStore for FixedCredentials {
        async fn find_by_username(&self, username: &str) -> StoreResult<Option<Credential>> {
            Ok(self.0.get(username).cloned())
        }
    }

    struct BrokenCredentials;

    #[async_trait]
    impl CredentialStore for BrokenCredentials {
        async fn find_by_username(&self, _username: &str) -> StoreResult<Option<Credential>> {
            Err(StoreError::backend("connection reset"))
        }
    }

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4).unwrap()
    }

    fn jwt() -> JwtManager {
        JwtManager::new(JwtConfig::new("issuer-test-secret-long-enough-for-hs256")).unwrap()
    }

    fn issuer() -> TokenIssuer {
        let hasher = hasher();
        let mut users = HashMap::new();
        for (name, password, approved, role) in [
            ("alice", "wonderland", true, "Creator"),
            ("pending", "letmein", false, "User"),
        ] {
            users.insert(
                name.to_string(),
                Credential {
                    user_id: UserId::generate(),
                    username: name.to_string(),
                    password_hash: hasher.hash(password).unwrap(),
                    approved,
                    role: role.to_string(),
                },
            );
        }
        TokenIssuer::new(Arc::new(FixedCredentials(users)), hasher, jwt())
    }

    fn unauthorized_message(err: ApiError) -> String {
        match err {
            ApiError::Unauthorized { message } => message,
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_issue_token_success() {
        let issuer = issuer();
        let issued = issuer.issue_token("alice", "wonderland").await.unwrap();

        let claims = issuer.jwt().validate_token(&issued.access_token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role(), Role::Creator);
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(claims, issued.claims);
    }

    #[tokio::test]
    async fn test_both_fields_reported() {
        let err = issuer().issue_token("", "").await.unwrap_err();
        match err {
            ApiError::Validation { errors } => {
                assert!(errors.contains("user_name"));
                assert!(errors.contains("user_password"));
                assert_eq!(errors.fields.len(), 2);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_whitespace_password_is_checked_not_rejected() {
        let err = issuer().issue_token("alice", "   ").await.unwrap_err();
        assert_eq!(unauthorized_message(err), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_alike() {
        let issuer = issuer();
        let unknown = issuer.issue_token("nobody", "wonderland").await.unwrap_err();
        let wrong = issuer.issue_token("alice", "looking-glass").await.unwrap_err();

        assert_eq!(unauthorized_message(unknown), INVALID_CREDENTIALS);
        assert_eq!(unauthorized_message(wrong), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_unapproved_is_distinct() {
        let issuer = issuer();
        let err = issuer.issue_token("pending", "letmein").await.unwrap_err();
        assert_eq!(unauthorized_message(err), NOT_APPROVED);

        // The approval state is not revealed without the right password.
        let err = issuer.issue_token("pending", "guess").await.unwrap_err();
        assert_eq!(unauthorized_message(err), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque() {
        let issuer = TokenIssuer::new(Arc::new(BrokenCredentials), hasher(), jwt());
        let err = issuer.issue_token("alice", "wonderland").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(err.user_message(), "internal server error");
    }
}
