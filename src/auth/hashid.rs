//! Reversible obfuscation of internal numeric ids
//!
//! Sequential database ids are never exposed to clients directly; they
//! are encoded into opaque hashid strings on the way out and decoded on
//! the way in. The encoding resists casual enumeration, nothing more —
//! it is not a cryptographic hash.

use crate::{config::AppConfig, error::AppError};
use harsh::Harsh;
use secrecy::ExposeSecret;
use thiserror::Error;

/// Decoding failure. Callers treat this as "resource not found";
/// the response never reveals whether the string was malformed or the
/// resource simply absent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a valid public id")]
    Malformed,
}

/// Id obfuscator, constructed once at startup from configuration.
///
/// The salt must be stable across restarts: a regenerated salt would
/// silently invalidate every public id previously handed to clients.
pub struct IdObfuscator {
    harsh: Harsh,
}

impl IdObfuscator {
    pub fn new(salt: &str, min_length: usize) -> Result<Self, AppError> {
        let harsh = Harsh::builder()
            .salt(salt)
            .length(min_length)
            .build()
            .map_err(|e| AppError::Config(format!("Invalid hashid configuration: {}", e)))?;

        Ok(Self { harsh })
    }

    /// Create obfuscator from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.hashid_salt.expose_secret(),
            config.security.hashid_min_length,
        )
    }

    /// Encode a positive internal id into an opaque public string
    pub fn encode(&self, id: i64) -> String {
        debug_assert!(id > 0, "internal ids are positive");
        self.harsh.encode(&[id as u64])
    }

    /// Decode a public string back into the internal id
    pub fn decode(&self, public_id: &str) -> Result<i64, DecodeError> {
        let values = self.harsh.decode(public_id).map_err(|_| DecodeError::Malformed)?;

        match values.as_slice() {
            [value] if *value > 0 && *value <= i64::MAX as u64 => Ok(*value as i64),
            _ => Err(DecodeError::Malformed),
        }
    }
}
