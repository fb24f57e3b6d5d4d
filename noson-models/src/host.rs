//! Address of the player whose content directory is browsed

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Default UPnP port of Sonos players
pub const DEFAULT_PORT: u16 = 1400;

/// Host and port of a media server
///
/// Artwork references in content directories are relative; they are made
/// absolute against `base_url()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHost {
    pub host: String,
    pub port: u16,
}

impl MediaHost {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for MediaHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for MediaHost {
    type Err = ModelError;

    /// Parse `host` or `host:port`, defaulting to port 1400
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ModelError::InvalidPort(s.to_string()))?;
                (host, port)
            }
            None => (s, DEFAULT_PORT),
        };

        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ModelError::InvalidHost(s.to_string()));
        }
        Ok(Self::new(host, port))
    }
}
