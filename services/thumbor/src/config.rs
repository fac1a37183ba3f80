use std::fmt::{Debug, Formatter};

use log::debug;
use thumbsign_core::{utils::Redact, Context};

use super::constants::*;

/// Config carries all the configuration for Thumbor URLs.
#[derive(Clone, Default)]
pub struct Config {
    /// `server` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`THUMBOR_SERVER`]
    /// - default value: [`DEFAULT_SERVER`]
    pub server: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`THUMBOR_KEY`]
    ///
    /// URLs are built as `unsafe` if it's still `None` or empty.
    pub secret: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Set secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(THUMBOR_SERVER) {
            debug!("load thumbor server from env: {v}");
            self.server.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(THUMBOR_KEY) {
            self.secret.get_or_insert(v);
        }

        self
    }

    /// The server to use, falling back to [`DEFAULT_SERVER`].
    pub fn server(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}
