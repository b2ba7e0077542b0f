// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Request bodies and configurations shared by the integration suites.

use quill_api::{ApiConfig, JwtConfig};
use serde_json::{json, Value};

// =============================================================================
// User Fixtures
// =============================================================================

/// Account fixtures.
pub struct UserFixtures;

impl UserFixtures {
    /// Password used for every seeded account.
    pub const PASSWORD: &'static str = "correct-horse-battery";

    /// Signup body with a derived email address.
    pub fn signup(user_name: &str) -> Value {
        json!({
            "user_name": user_name,
            "user_email": format!("{}@example.com", user_name),
            "user_password": Self::PASSWORD,
        })
    }

    /// Signup body requesting a specific role.
    pub fn signup_with_role(user_name: &str, role: &str) -> Value {
        let mut body = Self::signup(user_name);
        body["role"] = json!(role);
        body
    }

    /// Login body.
    pub fn login(user_name: &str, password: &str) -> Value {
        json!({ "user_name": user_name, "user_password": password })
    }
}

// =============================================================================
// Blog Fixtures
// =============================================================================

/// Blog post fixtures.
pub struct BlogFixtures;

impl BlogFixtures {
    /// A complete post.
    pub fn new_blog() -> Value {
        json!({
            "blog_subject": "Spring planting",
            "blog_owner_name": "Linda",
            "blog_owner_email": "linda@example.com",
            "blog_body": "The tomatoes go in after the last frost.",
            "blog_category": "garden",
        })
    }

    /// A partial update of the subject.
    pub fn subject_patch(subject: &str) -> Value {
        json!({ "blog_subject": subject })
    }
}

// =============================================================================
// Comment Fixtures
// =============================================================================

/// Comment fixtures.
pub struct CommentFixtures;

impl CommentFixtures {
    /// A complete comment.
    pub fn new_comment() -> Value {
        json!({
            "commenter_name": "Ed",
            "commenter_email": "ed@example.com",
            "comment_body": "Mine always go in too early.",
        })
    }

    /// A partial update of the body.
    pub fn body_patch(body: &str) -> Value {
        json!({ "comment_body": body })
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration fixtures.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Signing secret for test servers.
    pub const JWT_SECRET: &'static str = "integration-test-secret-that-is-long-enough";

    /// Server configuration with the lowest bcrypt cost.
    pub fn api_config() -> ApiConfig {
        ApiConfig::default()
            .with_jwt(JwtConfig::new(Self::JWT_SECRET))
            .with_bcrypt_cost(4)
    }

    /// A complete YAML configuration file.
    pub fn yaml() -> String {
        format!(
            r#"
server:
  bind_address: "127.0.0.1"
  port: 8080
  base_path: /api/v2
  request_timeout_secs: 10
  cors:
    allowed_origins:
      - "https://quill.example.com"
    allow_credentials: true
auth:
  jwt_secret: "{}"
  token_ttl_secs: 3600
  bcrypt_cost: 4
storage:
  database: blog
logging:
  level: debug
  format: json
"#,
            Self::JWT_SECRET
        )
    }
}
