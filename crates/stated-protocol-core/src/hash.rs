//! SHA-256 content hashing.
//!
//! Statement hashes, attachment hashes and content hashes are all SHA-256
//! digests. The external representation is URL-safe base64 without padding;
//! standard base64 and hex are accepted wherever a hash is read so that
//! values from legacy storage still verify.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of the given data.
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(data.as_ref()).into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// URL-safe base64 without padding. This is the form used in statements.
    pub fn to_url_safe(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Standard base64 with padding, as found in older storage.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hash from URL-safe base64, standard base64 or hex.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            hex::decode(s).map_err(|e| CodecError::InvalidEncoding(e.to_string()))?
        } else {
            decode_any_base64(s)?
        };
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CodecError::InvalidEncoding(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Check whether `data` hashes to this digest.
    pub fn matches(&self, data: impl AsRef<[u8]>) -> bool {
        Self::digest(data) == *self
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_safe())
    }
}

impl FromStr for Sha256Hash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Hash text or bytes, returning URL-safe base64 without padding.
pub fn sha256(data: impl AsRef<[u8]>) -> String {
    Sha256Hash::digest(data).to_url_safe()
}

/// Recompute the hash of `content` and compare it to `hash`.
///
/// `hash` may be given in any representation [`Sha256Hash::parse`] accepts.
pub fn verify(content: impl AsRef<[u8]>, hash: &str) -> bool {
    Sha256Hash::parse(hash)
        .map(|expected| expected.matches(content))
        .unwrap_or(false)
}

/// Decode either base64 alphabet, with or without padding.
pub(crate) fn decode_any_base64(s: &str) -> Result<Vec<u8>> {
    let normalized: String = s
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    STANDARD_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| CodecError::InvalidEncoding(e.to_string()))
}

/// Standard base64 to URL-safe base64 without padding.
pub fn to_url_safe_base64(base64: &str) -> String {
    base64
        .trim_end_matches('=')
        .replace('+', "-")
        .replace('/', "_")
}

/// URL-safe base64 to standard base64 with padding restored.
pub fn from_url_safe_base64(url_safe: &str) -> String {
    let mut out = url_safe.replace('-', "+").replace('_', "/");
    let padding = (4 - out.len() % 4) % 4;
    out.extend(std::iter::repeat('=').take(padding));
    out
}

/// Hex (legacy storage) to standard base64.
pub fn hex_to_b64(hex_str: &str) -> Result<String> {
    let bytes = hex::decode(hex_str).map_err(|e| CodecError::InvalidEncoding(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

/// Base64 in either alphabet to hex.
pub fn b64_to_hex(b64: &str) -> Result<String> {
    Ok(hex::encode(decode_any_base64(b64)?))
}
