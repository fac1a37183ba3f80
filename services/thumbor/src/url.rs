//! Signed Thumbor URL assembly.
use std::fmt::{Debug, Display, Formatter};

use log::debug;
use thumbsign_core::hash::base64_urlsafe_hmac_sha1;
use thumbsign_core::utils::Redact;

use super::constants::*;

/// ThumborUrl is a complete Thumbor URL: server, signature, commands and the original image.
///
/// ## Format
///
/// ```text
/// <server>/<signature>/<segment>/.../<original>
/// ```
///
/// `signature` is the URL safe base64 of `HMAC-SHA1(secret, <segment>/.../<original>)`,
/// or `unsafe` when no secret is configured.
///
/// ## Reference
///
/// - [Thumbor Security](https://thumbor.readthedocs.io/en/latest/security.html)
#[derive(Clone, PartialEq, Eq)]
pub struct ThumborUrl {
    server: String,
    secret: Option<String>,
    original: String,
    segments: Vec<String>,
}

impl ThumborUrl {
    /// Create a new ThumborUrl.
    pub fn new(
        server: impl Into<String>,
        secret: Option<String>,
        original: impl Into<String>,
        segments: Vec<String>,
    ) -> Self {
        Self {
            server: server.into(),
            secret,
            original: original.into(),
            segments,
        }
    }

    /// Path that gets signed: segments joined by `/`, followed by the original.
    pub fn path(&self) -> String {
        if self.segments.is_empty() {
            self.original.clone()
        } else {
            format!("{}/{}", self.segments.join("/"), self.original)
        }
    }

    /// Generate the complete URL.
    pub fn build(&self) -> String {
        let path = self.path();

        let signature = match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => Self::sign(&path, secret),
            _ => UNSAFE.to_string(),
        };
        debug!("thumbor path: {path}, signature: {signature}");

        format!(
            "{}/{}/{}",
            self.server.trim_end_matches('/'),
            signature,
            path
        )
    }

    /// Sign a path with HMAC-SHA1, encoded as URL safe base64.
    ///
    /// The output never contains `+` or `/`. Padding is kept.
    pub fn sign(path: &str, secret: &str) -> String {
        base64_urlsafe_hmac_sha1(secret.as_bytes(), path.as_bytes())
    }
}

impl Display for ThumborUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

impl Debug for ThumborUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumborUrl")
            .field("server", &self.server)
            .field("secret", &Redact::from(&self.secret))
            .field("original", &self.original)
            .field("segments", &self.segments)
            .finish()
    }
}
