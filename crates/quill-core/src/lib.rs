// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-core
//!
//! Core abstractions shared across the Quill blog backend:
//!
//! - **Types**: time-ordered identifiers (`UserId`, `BlogId`, `CommentId`)
//! - **Model**: users, blog posts and comments with their write inputs
//! - **Store**: async persistence traits, the `Store` handle and an in-memory backend
//! - **Notify**: outbound message composition and the `Notifier` trait
//! - **Error**: `StoreError` and `NotifyError`
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_core::{model::NewBlog, Store};
//!
//! let store = Store::memory();
//! let blog = store.blogs().insert_blog(NewBlog::default()).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod model;
pub mod notify;
pub mod store;
pub mod types;

pub use error::{NotifyError, StoreError, StoreResult};
pub use model::{
    Blog, BlogPatch, Comment, CommentPatch, NewBlog, NewComment, NewUser, User, UserPatch,
};
pub use notify::{EmailMessage, LogNotifier, Notifier};
pub use store::{Credential, CredentialStore, MemoryStore, Store, StoreBackend};
pub use types::{BlogId, CommentId, UserId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
