//! Builders and signers for Thumbor image URLs.
//!
//! ## Example
//!
//! ```
//! use thumbsign_core::{Context, StaticEnv};
//! use thumbsign_thumbor::{Config, Dimension, Thumbor};
//! use std::collections::HashMap;
//!
//! # fn main() -> thumbsign_core::Result<()> {
//! let ctx = Context::new().with_env(StaticEnv {
//!     envs: HashMap::from_iter([
//!         ("THUMBOR_SERVER".to_string(), "http://thumbor.example.com".to_string()),
//!     ]),
//! });
//! let thumbor = Thumbor::from_config(Config::new().from_env(&ctx))?;
//!
//! let url = thumbor
//!     .url("https://example.com/images/test.jpg")
//!     .resize(Dimension::Orig, 480)
//!     .flip_vertical(true)
//!     .call("brightness(10)")?
//!     .to_string();
//!
//! assert_eq!(
//!     url,
//!     "http://thumbor.example.com/unsafe/origx-480/filters:brightness(10)/https://example.com/images/test.jpg"
//! );
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod command_set;
pub use command_set::{CommandSet, Dimension, Filter, FilterArg, Resize, ResizeKind};

mod command;
pub use command::Command;

mod url;
pub use url::ThumborUrl;

mod builder;
pub use builder::UrlBuilder;

mod thumbor;
pub use thumbor::Thumbor;
