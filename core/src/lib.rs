//! Core components for building signed image URLs.
//!
//! This crate provides the foundational types shared by the thumbsign
//! services: the error type, hashing helpers used to compute URL
//! signatures, and the [`Context`] configuration is loaded from.
//!
//! ## Example
//!
//! ```
//! use thumbsign_core::hash::base64_urlsafe_hmac_sha1;
//! use thumbsign_core::{Context, StaticEnv};
//! use std::collections::HashMap;
//!
//! let ctx = Context::new().with_env(StaticEnv {
//!     envs: HashMap::from_iter([("THUMBOR_KEY".to_string(), "secret".to_string())]),
//! });
//! let key = ctx.env_var("THUMBOR_KEY").unwrap_or_default();
//!
//! let signature = base64_urlsafe_hmac_sha1(key.as_bytes(), b"fit-in/640x480/image.jpg");
//! assert!(!signature.contains('+') && !signature.contains('/'));
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};
