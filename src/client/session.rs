//! Authenticated session loading.
//!
//! The feed requires a logged-in session. Credentials are captured out of
//! band as a JSON object of cookie name to value pairs (the conventional
//! `cookies.json` export); renewal is out of scope, an expired session shows
//! up as rejected requests.

use std::collections::BTreeMap;
use std::path::Path;

/// Session loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Cookie file could not be read
    #[error("failed to read session file {path}: {detail}")]
    Io {
        /// Path that was attempted
        path: String,
        /// Underlying I/O error
        detail: String,
    },

    /// Cookie file is not a JSON object of string pairs
    #[error("invalid session file {path}: {detail}")]
    Parse {
        /// Path that was attempted
        path: String,
        /// Underlying parse error
        detail: String,
    },

    /// Cookie file parsed but contains no cookies
    #[error("session file {0} contains no cookies")]
    Empty(String),
}

/// An authenticated feed session, loaded once at setup.
#[derive(Debug, Clone)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Load a session from a JSON cookie file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| SessionError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;

        let cookies: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| SessionError::Parse {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;

        if cookies.is_empty() {
            return Err(SessionError::Empty(path.display().to_string()));
        }

        Ok(Self { cookies })
    }

    /// Render the `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Number of cookies in the session.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Whether the session holds no cookies. Always false for loaded sessions.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
