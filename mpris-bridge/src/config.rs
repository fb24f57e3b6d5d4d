//! Bridge configuration
//!
//! The two names mirror what a desktop application declares about itself:
//! a reverse-DNS application name (used for the desktop entry and the
//! service path) and a short display name (used in the bus name, so it must
//! be a valid bus name element).

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Reverse-DNS application name, e.g. `io.github.janbar.noson`
    pub application_name: String,

    /// Human-facing application name, e.g. `Noson`
    pub display_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            application_name: "io.github.janbar.noson".to_string(),
            display_name: "Noson".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn new(application_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            display_name: display_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.application_name.is_empty() {
            return Err(BridgeError::Configuration(
                "application_name must not be empty".to_string(),
            ));
        }

        if self
            .application_name
            .split('.')
            .any(|segment| segment.is_empty() || !segment.chars().all(is_path_char))
        {
            return Err(BridgeError::Configuration(format!(
                "application_name '{}' is not a dotted name of [A-Za-z0-9_] segments",
                self.application_name
            )));
        }

        if !is_bus_name_element(&self.display_name) {
            return Err(BridgeError::Configuration(format!(
                "display_name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                self.display_name
            )));
        }

        Ok(())
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `s` is usable as one element of a bus name
pub(crate) fn is_bus_name_element(s: &str) -> bool {
    match s.chars().next() {
        None => false,
        Some(first) if first.is_ascii_digit() => false,
        Some(_) => s.chars().all(is_path_char),
    }
}
