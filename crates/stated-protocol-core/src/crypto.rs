//! Ed25519 keys and signatures with the text encodings used in statements.
//!
//! Keys and signatures travel as URL-safe base64 without padding. Public keys
//! may also be hex, and both key kinds may be DER-wrapped (SPKI for public
//! keys, PKCS#8 for private keys) as produced by common crypto libraries.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodecError, Result};
use crate::hash::decode_any_base64;

/// The only signature algorithm statements declare.
pub const SIGNATURE_ALGORITHM: &str = "Ed25519";

/// DER prefix of an Ed25519 SubjectPublicKeyInfo.
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// DER prefix of an Ed25519 PKCS#8 private key.
const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

/// Decode key text (base64 of either alphabet, or hex) and strip a DER prefix.
fn decode_key(s: &str, der_prefix: &[u8], what: &str) -> Result<[u8; 32]> {
    let bytes = if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        hex::decode(s).map_err(|e| CodecError::InvalidKey(e.to_string()))?
    } else {
        decode_any_base64(s).map_err(|e| CodecError::InvalidKey(format!("{what}: {e}")))?
    };
    let raw = match bytes.strip_prefix(der_prefix) {
        Some(rest) => rest,
        None => bytes.as_slice(),
    };
    raw.try_into().map_err(|_| {
        CodecError::InvalidKey(format!("{what} must be 32 bytes, got {}", raw.len()))
    })
}

/// Public key of a statement signer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// URL-safe base64 without padding.
    pub fn to_url_safe(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Lower-case hex, as older hosts stored keys.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from base64 (raw or SPKI DER) or hex.
    pub fn parse(s: &str) -> Result<Self> {
        decode_key(s, &SPKI_PREFIX, "public key").map(Self)
    }

    /// Check `signature` over `message`; a key that is not a curve point
    /// is reported as `InvalidKey`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CodecError::InvalidKey(e.to_string()))?
            .verify(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
            .map_err(|_| CodecError::SignatureInvalid)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_url_safe())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_safe())
    }
}

/// Ed25519 signature over the unsigned statement text.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// URL-safe base64 without padding.
    pub fn to_url_safe(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parse from base64 of either alphabet.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = decode_any_base64(s)?;
        <[u8; 64]>::try_from(bytes.as_slice()).map(Self).map_err(|_| {
            CodecError::InvalidEncoding(format!("signature must be 64 bytes, got {}", bytes.len()))
        })
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_url_safe()[..11])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_safe())
    }
}

/// The signing identity of a publishing domain.
#[derive(Clone)]
pub struct Keypair {
    key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair; the seed is the private key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a private key given as base64 (raw seed or PKCS#8 DER) or hex.
    pub fn from_private_key(s: &str) -> Result<Self> {
        decode_key(s, &PKCS8_PREFIX, "private key").map(|seed| Self::from_seed(&seed))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.key.sign(message).to_bytes())
    }

    /// Secret key material.
    pub fn seed(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// The seed as URL-safe base64, the form [`Keypair::from_private_key`] reads.
    pub fn private_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.seed())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.public_key()).finish()
    }
}

/// A freshly generated keypair in its text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedKeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// Generate a new keypair encoded as URL-safe base64 strings.
pub fn generate_key_pair() -> EncodedKeyPair {
    let keypair = Keypair::generate();
    EncodedKeyPair {
        public_key: keypair.public_key().to_url_safe(),
        private_key: keypair.private_key(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let signer = Keypair::generate();
        let statement = b"Statement content: hi\n";
        let signature = signer.sign(statement);
        assert_eq!(signer.public_key().verify(statement, &signature), Ok(()));
        assert_eq!(
            signer.public_key().verify(b"Statement content: ho\n", &signature),
            Err(CodecError::SignatureInvalid)
        );
        let stranger = Keypair::generate().public_key();
        assert_eq!(stranger.verify(statement, &signature), Err(CodecError::SignatureInvalid));
    }

    #[test]
    fn test_seeded_keys_are_reproducible() {
        let a = Keypair::from_seed(&[0x42; 32]);
        let b = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"same"), b.sign(b"same"));
        assert_eq!(a.public_key().to_url_safe(), "IVL40Zt5HSRFMkLhXy6rbLfP-ntqXtMAl5YOBpiB2xI");
        assert_eq!(a.seed(), [0x42; 32]);
    }

    #[test]
    fn test_generated_key_pair_roundtrip() {
        let encoded = generate_key_pair();
        assert_eq!(encoded.public_key.len(), 43);
        let keypair = Keypair::from_private_key(&encoded.private_key).unwrap();
        assert_eq!(keypair.public_key().to_url_safe(), encoded.public_key);
    }

    #[test]
    fn test_public_key_encodings() {
        let pk = Keypair::from_seed(&[7u8; 32]).public_key();
        assert_eq!(PublicKey::parse(&pk.to_url_safe()).unwrap(), pk);
        assert_eq!(PublicKey::parse(&pk.to_hex()).unwrap(), pk);

        let mut der = SPKI_PREFIX.to_vec();
        der.extend_from_slice(pk.as_bytes());
        let der_b64 = URL_SAFE_NO_PAD.encode(&der);
        assert_eq!(PublicKey::parse(&der_b64).unwrap(), pk);
    }

    #[test]
    fn test_private_key_pkcs8() {
        let keypair = Keypair::from_seed(&[9u8; 32]);
        let mut der = PKCS8_PREFIX.to_vec();
        der.extend_from_slice(&keypair.seed());
        let loaded = Keypair::from_private_key(&URL_SAFE_NO_PAD.encode(&der)).unwrap();
        assert_eq!(loaded.public_key(), keypair.public_key());
    }

    #[test]
    fn test_invalid_key_lengths() {
        assert!(matches!(
            PublicKey::parse("AAAA"),
            Err(CodecError::InvalidKey(_))
        ));
        assert!(matches!(
            Keypair::from_private_key("!!"),
            Err(CodecError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_signature_text_roundtrip() {
        let sig = Keypair::from_seed(&[1u8; 32]).sign(b"m");
        assert_eq!(Signature::parse(&sig.to_url_safe()).unwrap(), sig);
        assert!(Signature::parse("AAAA").is_err());
    }
}
