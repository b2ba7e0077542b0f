// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory storage backend.
//!
//! Records live in `BTreeMap`s keyed by time-ordered ids, so iteration order
//! is creation order. Each collection has its own `parking_lot::RwLock`;
//! uniqueness checks and the insert they guard happen under one write lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    Blog, BlogPatch, Comment, CommentPatch, NewBlog, NewComment, NewUser, User, UserPatch,
};
use crate::store::{BlogStore, CommentStore, StoreBackend, UserStore};
use crate::types::{BlogId, CommentId, UserId};

/// A volatile backend; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<UserId, User>>,
    blogs: RwLock<BTreeMap<BlogId, Blog>>,
    comments: RwLock<BTreeMap<CommentId, Comment>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::unavailable("memory store is closed"))
        } else {
            Ok(())
        }
    }

    fn check_user_unique(
        users: &BTreeMap<UserId, User>,
        skip: Option<UserId>,
        user_name: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<()> {
        for user in users.values().filter(|u| Some(u.id) != skip) {
            if email.is_some_and(|e| user.user_email == e) {
                return Err(StoreError::conflict("email already in use"));
            }
            if user_name.is_some_and(|n| user.user_name == n) {
                return Err(StoreError::conflict("username already in use"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// UserStore
// =============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.ensure_open()?;
        Ok(self.users.read().values().cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.ensure_open()?;
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_user_by_name(&self, user_name: &str) -> StoreResult<Option<User>> {
        self.ensure_open()?;
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.ensure_open()?;
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.user_email == email)
            .cloned())
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        self.ensure_open()?;
        let mut users = self.users.write();
        Self::check_user_unique(&users, None, Some(&new.user_name), Some(&new.user_email))?;

        let user = User::from_new(new);
        users.insert(user.id, user.clone());
        debug!(user_id = %user.id, user_name = %user.user_name, "User inserted");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> StoreResult<User> {
        self.ensure_open()?;
        let mut users = self.users.write();
        if !users.contains_key(&id) {
            return Err(StoreError::not_found(UserId::ENTITY, id));
        }
        Self::check_user_unique(
            &users,
            Some(id),
            patch.user_name.as_deref(),
            patch.user_email.as_deref(),
        )?;

        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(UserId::ENTITY, id))?;
        user.apply(patch);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        self.ensure_open()?;
        self.users
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(UserId::ENTITY, id))
    }
}

// =============================================================================
// BlogStore
// =============================================================================

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        self.ensure_open()?;
        Ok(self.blogs.read().values().rev().cloned().collect())
    }

    async fn get_blog(&self, id: BlogId) -> StoreResult<Option<Blog>> {
        self.ensure_open()?;
        Ok(self.blogs.read().get(&id).cloned())
    }

    async fn insert_blog(&self, new: NewBlog) -> StoreResult<Blog> {
        self.ensure_open()?;
        let blog = Blog::from_new(new);
        self.blogs.write().insert(blog.id, blog.clone());
        debug!(blog_id = %blog.id, "Blog inserted");
        Ok(blog)
    }

    async fn update_blog(&self, id: BlogId, patch: BlogPatch) -> StoreResult<Blog> {
        self.ensure_open()?;
        let mut blogs = self.blogs.write();
        let blog = blogs
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(BlogId::ENTITY, id))?;
        blog.apply(patch);
        Ok(blog.clone())
    }

    async fn delete_blog(&self, id: BlogId) -> StoreResult<()> {
        self.ensure_open()?;
        if self.blogs.write().remove(&id).is_none() {
            return Err(StoreError::not_found(BlogId::ENTITY, id));
        }
        let mut comments = self.comments.write();
        let before = comments.len();
        comments.retain(|_, c| c.blog_id != id);
        debug!(blog_id = %id, removed_comments = before - comments.len(), "Blog deleted");
        Ok(())
    }
}

// =============================================================================
// CommentStore
// =============================================================================

#[async_trait]
impl CommentStore for MemoryStore {
    async fn list_comments(&self, blog_id: BlogId) -> StoreResult<Vec<Comment>> {
        self.ensure_open()?;
        Ok(self
            .comments
            .read()
            .values()
            .filter(|c| c.blog_id == blog_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, blog_id: BlogId, new: NewComment) -> StoreResult<Comment> {
        self.ensure_open()?;
        if !self.blogs.read().contains_key(&blog_id) {
            return Err(StoreError::not_found(BlogId::ENTITY, blog_id));
        }
        let comment = Comment::from_new(blog_id, new);
        self.comments.write().insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        blog_id: BlogId,
        id: CommentId,
        patch: CommentPatch,
    ) -> StoreResult<Comment> {
        self.ensure_open()?;
        let mut comments = self.comments.write();
        let comment = comments
            .get_mut(&id)
            .filter(|c| c.blog_id == blog_id)
            .ok_or_else(|| StoreError::not_found(CommentId::ENTITY, id))?;
        comment.apply(patch);
        Ok(comment.clone())
    }

    async fn delete_comment(&self, blog_id: BlogId, id: CommentId) -> StoreResult<()> {
        self.ensure_open()?;
        let mut comments = self.comments.write();
        match comments.get(&id) {
            Some(c) if c.blog_id == blog_id => {
                comments.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::not_found(CommentId::ENTITY, id)),
        }
    }
}

// =============================================================================
// StoreBackend
// =============================================================================

#[async_trait]
impl StoreBackend for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CredentialStore, Store};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            user_name: name.to_string(),
            user_email: email.to_string(),
            password_hash: "hash".to_string(),
            role: "User".to_string(),
            approved: false,
            verify_code: None,
            verify_expires: None,
        }
    }

    fn new_blog(subject: &str) -> NewBlog {
        NewBlog {
            blog_subject: subject.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice", "a@x.io")).await.unwrap();

        let err = store.insert_user(new_user("bob", "a@x.io")).await.unwrap_err();
        assert_eq!(err.to_string(), "email already in use");

        let err = store.insert_user(new_user("alice", "b@x.io")).await.unwrap_err();
        assert_eq!(err.to_string(), "username already in use");

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_conflict_and_self() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "a@x.io")).await.unwrap();
        store.insert_user(new_user("bob", "b@x.io")).await.unwrap();

        // Renaming onto an existing name is rejected.
        let patch = UserPatch {
            user_name: Some("bob".into()),
            ..Default::default()
        };
        assert!(store.update_user(alice.id, patch).await.unwrap_err().is_conflict());

        // Re-submitting your own email is fine.
        let patch = UserPatch {
            user_email: Some("a@x.io".into()),
            approved: Some(true),
            ..Default::default()
        };
        let updated = store.update_user(alice.id, patch).await.unwrap();
        assert!(updated.approved);

        let missing = store
            .update_user(UserId::generate(), UserPatch::default())
            .await
            .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_blogs_newest_first_and_cascade() {
        let store = MemoryStore::new();
        let first = store.insert_blog(new_blog("first")).await.unwrap();
        let second = store.insert_blog(new_blog("second")).await.unwrap();

        let listed = store.list_blogs().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        store
            .insert_comment(first.id, NewComment::default())
            .await
            .unwrap();
        store.delete_blog(first.id).await.unwrap();

        assert!(store.list_comments(first.id).await.unwrap().is_empty());
        assert!(store.delete_blog(first.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_comment_scoped_to_blog() {
        let store = MemoryStore::new();
        let blog = store.insert_blog(new_blog("post")).await.unwrap();
        let other = store.insert_blog(new_blog("other")).await.unwrap();

        let comment = store
            .insert_comment(blog.id, NewComment::default())
            .await
            .unwrap();

        let err = store
            .update_comment(other.id, comment.id, CommentPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = store.delete_comment(other.id, comment.id).await.unwrap_err();
        assert!(err.is_not_found());

        store.delete_comment(blog.id, comment.id).await.unwrap();
        assert!(store.list_comments(blog.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_blog() {
        let store = MemoryStore::new();
        let err = store
            .insert_comment(BlogId::generate(), NewComment::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let store = Store::memory();
        store.ping().await.unwrap();
        store.close().await;

        assert!(matches!(
            store.ping().await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.blogs().list_blogs().await.is_err());
    }

    #[tokio::test]
    async fn test_credential_lookup() {
        let store = Store::memory();
        let mut new = new_user("alice", "a@x.io");
        new.role = "Creator".into();
        new.approved = true;
        let user = store.users().insert_user(new).await.unwrap();

        let credentials = store.credentials();
        let cred = credentials.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(cred.user_id, user.id);
        assert_eq!(cred.role, "Creator");
        assert!(cred.approved);

        assert!(credentials.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_credential_lookup_on_backend() {
        let memory = MemoryStore::new();
        memory
            .insert_user(new_user("bob", "b@x.io"))
            .await
            .unwrap();

        let cred = CredentialStore::find_by_username(&memory, "bob")
            .await
            .unwrap()
            .unwrap();
        assert!(!cred.approved);
        assert_eq!(cred.role, "User");
    }
}
