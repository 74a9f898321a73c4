//! Import run configuration and its validation.
//!
//! ```
//! use foerr_logic::config::{validate_config, ImportConfig};
//!
//! let mut config = ImportConfig::default();
//! assert!(validate_config(&config).is_empty());
//! config.pad = Some(4);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_PAD_CNT;

/// Options shared by every location translated in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Pad every cell to this many characters. `None` writes cells at their
    /// natural length and reports the longest one instead.
    pub pad: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Import padding must be `1..=MAX_PAD_CNT`; re-padding also allows 0.
    #[error("invalid pad size: {pad} (allowed {min}..={})", MAX_PAD_CNT)]
    PadOutOfRange { pad: usize, min: usize },
}

/// Validate an import configuration. Returns every problem found.
pub fn validate_config(config: &ImportConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    if let Some(pad) = config.pad {
        if !(1..=MAX_PAD_CNT).contains(&pad) {
            errors.push(ConfigError::PadOutOfRange { pad, min: 1 });
        }
    }
    errors
}

/// Validate a re-padding size, where 0 means "strip padding".
pub fn validate_repad(pad: usize) -> Result<(), ConfigError> {
    if pad > MAX_PAD_CNT {
        return Err(ConfigError::PadOutOfRange { pad, min: 0 });
    }
    Ok(())
}
