// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persistence traits and the shared store handle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Store                             │
//! │            (cheaply cloneable handle)                    │
//! └────────────────────────┬─────────────────────────────────┘
//!          ┌───────────────┼───────────────┬───────────────┐
//!          ▼               ▼               ▼               ▼
//!     UserStore       BlogStore      CommentStore   CredentialStore
//! ```
//!
//! The handle is constructed once at startup and passed explicitly to
//! whatever needs it. [`Store::close`] ends its lifecycle; operations on a
//! closed backend fail with
//! [`StoreError::Unavailable`](crate::error::StoreError::Unavailable).

mod memory;

pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use quill_config::{StorageConfig, StorageKind};
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::model::{
    Blog, BlogPatch, Comment, CommentPatch, NewBlog, NewComment, NewUser, User, UserPatch,
};
use crate::types::{BlogId, CommentId, UserId};

// =============================================================================
// Record Stores
// =============================================================================

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns all users, oldest first.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Returns the user with `id`.
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Looks up a user by exact login name.
    async fn find_user_by_name(&self, user_name: &str) -> StoreResult<Option<User>>;

    /// Looks up a user by exact email address.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user.
    ///
    /// Fails with a conflict when the email or login name is already taken.
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;

    /// Applies `patch` to the user with `id` and returns the updated record.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> StoreResult<User>;

    /// Deletes the user with `id`.
    async fn delete_user(&self, id: UserId) -> StoreResult<()>;
}

/// Blog post persistence.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Returns all posts, newest first.
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>>;

    /// Returns the post with `id`.
    async fn get_blog(&self, id: BlogId) -> StoreResult<Option<Blog>>;

    /// Inserts a post.
    async fn insert_blog(&self, new: NewBlog) -> StoreResult<Blog>;

    /// Applies `patch` to the post with `id`.
    async fn update_blog(&self, id: BlogId, patch: BlogPatch) -> StoreResult<Blog>;

    /// Deletes the post with `id` along with its comments.
    async fn delete_blog(&self, id: BlogId) -> StoreResult<()>;
}

/// Comment persistence. Every operation is scoped to the owning post.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Returns the comments on `blog_id`, oldest first.
    async fn list_comments(&self, blog_id: BlogId) -> StoreResult<Vec<Comment>>;

    /// Adds a comment to `blog_id`.
    async fn insert_comment(&self, blog_id: BlogId, new: NewComment) -> StoreResult<Comment>;

    /// Updates a comment. Both ids must match.
    async fn update_comment(
        &self,
        blog_id: BlogId,
        id: CommentId,
        patch: CommentPatch,
    ) -> StoreResult<Comment>;

    /// Deletes a comment. Both ids must match.
    async fn delete_comment(&self, blog_id: BlogId, id: CommentId) -> StoreResult<()>;
}

// =============================================================================
// Backend
// =============================================================================

/// Lifecycle of a storage backend.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Checks that the backend can serve requests.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases backend resources.
    async fn close(&self);
}

/// Cloneable handle to the configured backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StoreBackend>,
    users: Arc<dyn UserStore>,
    blogs: Arc<dyn BlogStore>,
    comments: Arc<dyn CommentStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl Store {
    /// Wraps a backend that serves every record type.
    pub fn new<B>(backend: Arc<B>) -> Self
    where
        B: StoreBackend + UserStore + BlogStore + CommentStore + 'static,
    {
        Self {
            users: backend.clone(),
            blogs: backend.clone(),
            comments: backend.clone(),
            credentials: backend.clone(),
            backend,
        }
    }

    /// Creates a handle over a fresh in-memory backend.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Opens the backend described by `config`.
    pub fn connect(config: &StorageConfig) -> StoreResult<Self> {
        match config.backend {
            StorageKind::Memory => {
                if config.url.is_some() {
                    warn!(
                        database = %config.database,
                        "Storage URL is ignored by the memory backend"
                    );
                }
                info!(backend = "memory", database = %config.database, "Store opened");
                Ok(Self::memory())
            }
        }
    }

    /// Backend name.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// User records.
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Blog records.
    pub fn blogs(&self) -> &dyn BlogStore {
        self.blogs.as_ref()
    }

    /// Comment records.
    pub fn comments(&self) -> &dyn CommentStore {
        self.comments.as_ref()
    }

    /// Credential lookup for the login path.
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.credentials.clone()
    }

    /// Checks backend health.
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    /// Closes the backend.
    pub async fn close(&self) {
        info!(backend = self.backend.name(), "Closing store");
        self.backend.close().await;
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend.name())
            .finish()
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// The login-relevant slice of a user record.
#[derive(Clone)]
pub struct Credential {
    /// Durable account identifier.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// bcrypt hash.
    pub password_hash: String,
    /// Whether the account may log in.
    pub approved: bool,
    /// Canonical role name.
    pub role: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("approved", &self.approved)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl From<User> for Credential {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.user_name,
            password_hash: user.password_hash,
            approved: user.approved,
            role: user.role,
        }
    }
}

/// Credential lookup consumed by the login path.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds the credential for `username`, or `None` if no such account exists.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Credential>>;
}

#[async_trait]
impl<T: UserStore + ?Sized> CredentialStore for T {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Credential>> {
        Ok(self
            .find_user_by_name(username)
            .await?
            .map(Credential::from))
    }
}
