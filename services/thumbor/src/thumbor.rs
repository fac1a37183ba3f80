use std::fmt::{Debug, Formatter};

use log::warn;
use thumbsign_core::utils::Redact;
use thumbsign_core::{Error, Result};

use super::builder::UrlBuilder;
use super::config::Config;

/// Thumbor is the entry point: it holds the server and secret and hands out
/// one [`UrlBuilder`] per image.
///
/// ```
/// use thumbsign_thumbor::Thumbor;
///
/// let thumbor = Thumbor::new("https://thumbor.example.com", Some("my-secret-key".to_string()));
/// assert!(thumbor.has_secret());
///
/// let url = thumbor
///     .url("https://example.com/image.jpg")
///     .fit_in(640, 480)
///     .quality(80)
///     .to_string();
/// assert!(url.starts_with("https://thumbor.example.com/"));
/// ```
#[derive(Clone)]
pub struct Thumbor {
    server: String,
    secret: Option<String>,
}

impl Thumbor {
    /// Create a new Thumbor factory.
    pub fn new(server: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            server: server.into(),
            secret,
        }
    }

    /// Create a Thumbor factory from config.
    ///
    /// Returns a `ConfigInvalid` error if the configured server is empty.
    pub fn from_config(config: Config) -> Result<Self> {
        let server = config.server();
        if server.trim().is_empty() {
            return Err(Error::config_invalid("thumbor server must not be empty"));
        }

        let thumbor = Self::new(server, config.secret.clone());
        if !thumbor.has_secret() {
            warn!("thumbor secret is not set, urls for {server} will be unsafe");
        }
        Ok(thumbor)
    }

    /// Create a URL builder for the given image.
    pub fn url(&self, original: impl Into<String>) -> UrlBuilder {
        UrlBuilder::new(self.server.clone(), self.secret.clone(), original)
    }

    /// The configured server.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Whether URLs will be signed: the secret is set and not empty.
    pub fn has_secret(&self) -> bool {
        self.secret.as_deref().is_some_and(|v| !v.is_empty())
    }
}

impl Debug for Thumbor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbor")
            .field("server", &self.server)
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}
