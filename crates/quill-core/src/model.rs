// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persisted records and their write-side inputs.
//!
//! Field names on the wire follow the public JSON contract (`user_name`,
//! `blog_subject`, `createdAt`, ...). Secrets on [`User`] are never serialized.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BlogId, CommentId, UserId};

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Clone, Serialize)]
pub struct User {
    /// Account identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Login name, unique.
    pub user_name: String,
    /// Contact address, unique.
    pub user_email: String,
    /// bcrypt hash of the password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may log in.
    #[serde(rename = "user_approved")]
    pub approved: bool,
    /// Pending email verification code.
    #[serde(skip_serializing)]
    pub verify_code: Option<String>,
    /// Expiry of `verify_code`.
    #[serde(rename = "user_verify_expires", skip_serializing_if = "Option::is_none")]
    pub verify_expires: Option<DateTime<Utc>>,
    /// Canonical role name.
    pub role: String,
    /// Creation time.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a user record from creation input.
    pub fn from_new(new: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            user_name: new.user_name,
            user_email: new.user_email,
            password_hash: new.password_hash,
            approved: new.approved,
            verify_code: new.verify_code,
            verify_expires: new.verify_expires,
            role: new.role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.user_name {
            self.user_name = name;
        }
        if let Some(email) = patch.user_email {
            self.user_email = email;
        }
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(approved) = patch.approved {
            self.approved = approved;
        }
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("user_email", &self.user_email)
            .field("approved", &self.approved)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name.
    pub user_name: String,
    /// Contact address.
    pub user_email: String,
    /// bcrypt hash.
    pub password_hash: String,
    /// Canonical role name.
    pub role: String,
    /// Initial approval state.
    pub approved: bool,
    /// Verification code to mail out.
    pub verify_code: Option<String>,
    /// Expiry of the verification code.
    pub verify_expires: Option<DateTime<Utc>>,
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New login name.
    pub user_name: Option<String>,
    /// New contact address.
    pub user_email: Option<String>,
    /// New bcrypt hash.
    pub password_hash: Option<String>,
    /// New role name.
    pub role: Option<String>,
    /// New approval state.
    pub approved: Option<bool>,
}

// =============================================================================
// Blog
// =============================================================================

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Post identifier.
    #[serde(rename = "_id")]
    pub id: BlogId,
    /// Title.
    pub blog_subject: String,
    /// Author display name.
    pub blog_owner_name: String,
    /// Author contact address.
    pub blog_owner_email: String,
    /// Body text.
    pub blog_body: String,
    /// Free-form category.
    pub blog_category: String,
    /// Creation time.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Builds a post from creation input.
    pub fn from_new(new: NewBlog) -> Self {
        let now = Utc::now();
        Self {
            id: BlogId::generate(),
            blog_subject: new.blog_subject,
            blog_owner_name: new.blog_owner_name,
            blog_owner_email: new.blog_owner_email,
            blog_body: new.blog_body,
            blog_category: new.blog_category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: BlogPatch) {
        if let Some(v) = patch.blog_subject {
            self.blog_subject = v;
        }
        if let Some(v) = patch.blog_owner_name {
            self.blog_owner_name = v;
        }
        if let Some(v) = patch.blog_owner_email {
            self.blog_owner_email = v;
        }
        if let Some(v) = patch.blog_body {
            self.blog_body = v;
        }
        if let Some(v) = patch.blog_category {
            self.blog_category = v;
        }
        self.updated_at = Utc::now();
    }
}

/// Request body for creating a post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBlog {
    /// Title.
    pub blog_subject: String,
    /// Author display name.
    pub blog_owner_name: String,
    /// Author contact address.
    pub blog_owner_email: String,
    /// Body text.
    pub blog_body: String,
    /// Category.
    pub blog_category: String,
}

/// Request body for updating a post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogPatch {
    /// Title.
    pub blog_subject: Option<String>,
    /// Author display name.
    pub blog_owner_name: Option<String>,
    /// Author contact address.
    pub blog_owner_email: Option<String>,
    /// Body text.
    pub blog_body: Option<String>,
    /// Category.
    pub blog_category: Option<String>,
}

// =============================================================================
// Comment
// =============================================================================

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    #[serde(rename = "_id")]
    pub id: CommentId,
    /// Owning post.
    pub blog_id: BlogId,
    /// Commenter display name.
    pub commenter_name: String,
    /// Commenter contact address.
    pub commenter_email: String,
    /// Comment text.
    pub comment_body: String,
    /// Creation time.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Builds a comment on `blog_id`.
    pub fn from_new(blog_id: BlogId, new: NewComment) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::generate(),
            blog_id,
            commenter_name: new.commenter_name,
            commenter_email: new.commenter_email,
            comment_body: new.comment_body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place. The owning post never changes.
    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(v) = patch.commenter_name {
            self.commenter_name = v;
        }
        if let Some(v) = patch.commenter_email {
            self.commenter_email = v;
        }
        if let Some(v) = patch.comment_body {
            self.comment_body = v;
        }
        self.updated_at = Utc::now();
    }
}

/// Request body for creating a comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewComment {
    /// Commenter display name.
    pub commenter_name: String,
    /// Commenter contact address.
    pub commenter_email: String,
    /// Comment text.
    pub comment_body: String,
}

/// Request body for updating a comment.
///
/// Identity fields (`_id`, `blog_id`) in the body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentPatch {
    /// Commenter display name.
    pub commenter_name: Option<String>,
    /// Commenter contact address.
    pub commenter_email: Option<String>,
    /// Comment text.
    pub comment_body: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
