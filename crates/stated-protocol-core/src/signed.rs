//! Signed statements.
//!
//! A signature block is appended to the unsigned statement text:
//!
//! ```text
//! ---
//! Statement hash: <urlsafe-b64-sha256>
//! Public key: <urlsafe-b64-key>
//! Signature: <urlsafe-b64-signature>
//! Algorithm: Ed25519
//! ```
//!
//! The hash and the signature always cover the text before the `---` line,
//! exactly as it was passed in. Nothing after the separator is ever hashed
//! or signed.

use serde::{Deserialize, Serialize};

use crate::crypto::{Keypair, PublicKey, Signature, SIGNATURE_ALGORITHM};
use crate::error::{CodecError, Result};
use crate::hash;
use crate::statement::statement_hash;

/// Line separating a statement from its signature block.
pub const SIGNATURE_SEPARATOR: &str = "---";

const HASH_LABEL: &str = "Statement hash";
const PUBLIC_KEY_LABEL: &str = "Public key";
const SIGNATURE_LABEL: &str = "Signature";
const ALGORITHM_LABEL: &str = "Algorithm";

/// The decoded signature block of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBlock {
    /// The declared hash, as written.
    pub statement_hash: String,
    pub public_key: PublicKey,
    pub signature: Signature,
    pub algorithm: String,
}

/// Outcome of the two checks on a signed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub hash_matches: bool,
    pub signature_verified: bool,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.hash_matches && self.signature_verified
    }
}

impl SignatureBlock {
    /// Run both checks against the unsigned text.
    pub fn report(&self, statement: &str) -> VerificationReport {
        VerificationReport {
            hash_matches: hash::verify(statement, &self.statement_hash),
            signature_verified: self
                .public_key
                .verify(statement.as_bytes(), &self.signature)
                .is_ok(),
        }
    }

    /// Check the declared hash, then the signature.
    pub fn verify(&self, statement: &str) -> Result<()> {
        if !hash::verify(statement, &self.statement_hash) {
            return Err(CodecError::HashMismatch {
                declared: self.statement_hash.clone(),
                computed: statement_hash(statement),
            });
        }
        self.public_key.verify(statement.as_bytes(), &self.signature)
    }

    fn render(&self) -> String {
        format!(
            "{SIGNATURE_SEPARATOR}\n\
             {HASH_LABEL}: {}\n\
             {PUBLIC_KEY_LABEL}: {}\n\
             {SIGNATURE_LABEL}: {}\n\
             {ALGORITHM_LABEL}: {}\n",
            self.statement_hash,
            self.public_key.to_url_safe(),
            self.signature.to_url_safe(),
            self.algorithm,
        )
    }
}

/// A statement together with its signature block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedStatement {
    /// The unsigned statement text.
    pub statement: String,
    pub block: SignatureBlock,
}

impl SignedStatement {
    pub fn statement_hash(&self) -> &str {
        &self.block.statement_hash
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.block.public_key
    }

    pub fn signature(&self) -> &Signature {
        &self.block.signature
    }

    pub fn algorithm(&self) -> &str {
        &self.block.algorithm
    }

    pub fn report(&self) -> VerificationReport {
        self.block.report(&self.statement)
    }

    pub fn verify(&self) -> Result<()> {
        self.block.verify(&self.statement)
    }

    /// The full signed text.
    pub fn to_text(&self) -> String {
        format!("{}{}", self.statement, self.block.render())
    }
}

impl Keypair {
    /// Append a signature block to statement text.
    pub fn sign_statement(&self, statement: &str) -> Result<String> {
        if !statement.ends_with('\n') {
            return Err(CodecError::MalformedSignature(
                "statement text must end with a newline".into(),
            ));
        }
        if find_separator(statement).is_some() {
            return Err(CodecError::MalformedSignature(
                "statement is already signed".into(),
            ));
        }
        let block = SignatureBlock {
            statement_hash: statement_hash(statement),
            public_key: self.public_key(),
            signature: self.sign(statement.as_bytes()),
            algorithm: SIGNATURE_ALGORITHM.to_string(),
        };
        Ok(format!("{statement}{}", block.render()))
    }
}

/// Sign statement text with a private key given in text form.
///
/// `public_key` must belong to `private_key`.
pub fn build_signed_statement(statement: &str, private_key: &str, public_key: &str) -> Result<String> {
    let keypair = Keypair::from_private_key(private_key)?;
    if keypair.public_key() != PublicKey::parse(public_key)? {
        return Err(CodecError::InvalidKey(
            "public key does not belong to the private key".into(),
        ));
    }
    keypair.sign_statement(statement)
}

/// The two lines that open a signature block.
pub(crate) fn signature_marker() -> String {
    format!("{SIGNATURE_SEPARATOR}\n{HASH_LABEL}: ")
}

/// Start of the signature separator line, if the text has one.
fn find_separator(text: &str) -> Option<usize> {
    let marker = signature_marker();
    text.rmatch_indices(&marker)
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || text.as_bytes()[idx - 1] == b'\n')
}

/// Split signed text into the unsigned statement and its decoded block.
///
/// `Ok(None)` means the text carries no signature block.
pub fn split_signature(text: &str) -> Result<Option<(&str, SignatureBlock)>> {
    let Some(idx) = find_separator(text) else {
        return Ok(None);
    };
    let (statement, suffix) = text.split_at(idx);
    let mut lines = suffix
        .strip_prefix(SIGNATURE_SEPARATOR)
        .and_then(|s| s.strip_prefix('\n'))
        .unwrap_or_default()
        .split_terminator('\n');

    let statement_hash = next_value(&mut lines, HASH_LABEL)?.to_string();
    let public_key = PublicKey::parse(next_value(&mut lines, PUBLIC_KEY_LABEL)?)?;
    let signature = Signature::parse(next_value(&mut lines, SIGNATURE_LABEL)?)
        .map_err(|e| CodecError::MalformedSignature(e.to_string()))?;
    let algorithm = next_value(&mut lines, ALGORITHM_LABEL)?.to_string();
    if let Some(extra) = lines.next() {
        return Err(CodecError::MalformedSignature(format!(
            "unexpected line after the signature block: '{extra}'"
        )));
    }
    if algorithm != SIGNATURE_ALGORITHM {
        return Err(CodecError::MalformedSignature(format!(
            "unsupported algorithm '{algorithm}'"
        )));
    }

    Ok(Some((
        statement,
        SignatureBlock {
            statement_hash,
            public_key,
            signature,
            algorithm,
        },
    )))
}

fn next_value<'a>(lines: &mut impl Iterator<Item = &'a str>, label: &str) -> Result<&'a str> {
    lines
        .next()
        .and_then(|line| line.strip_prefix(label))
        .and_then(|rest| rest.strip_prefix(": "))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CodecError::MalformedSignature(format!("expected a '{label}' line")))
}

/// Parse signed text; `Ok(None)` if it has no signature block.
pub fn parse_signed_statement(text: &str) -> Result<Option<SignedStatement>> {
    Ok(split_signature(text)?.map(|(statement, block)| SignedStatement {
        statement: statement.to_string(),
        block,
    }))
}

/// Whether the declared hash matches and the signature is valid.
pub fn verify_signed_statement(text: &str) -> bool {
    matches!(parse_signed_statement(text), Ok(Some(signed)) if signed.verify().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "Publishing domain: example.com\nAuthor: Example\n\
                             Time: Mon, 01 Jan 2024 00:00:00 GMT\nFormat version: 5\n\
                             Statement content: hello\n";

    fn keypair() -> Keypair {
        Keypair::from_seed(&[7u8; 32])
    }

    #[test]
    fn test_sign_and_verify() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        assert!(signed.starts_with(STATEMENT));
        assert!(signed.ends_with("Algorithm: Ed25519\n"));
        assert!(verify_signed_statement(&signed));

        let parsed = parse_signed_statement(&signed).unwrap().unwrap();
        assert_eq!(parsed.statement, STATEMENT);
        assert_eq!(parsed.statement_hash(), statement_hash(STATEMENT));
        assert_eq!(parsed.public_key(), &keypair().public_key());
        assert_eq!(parsed.algorithm(), "Ed25519");
        assert_eq!(parsed.to_text(), signed);
    }

    #[test]
    fn test_signature_excluded_from_hash() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        let (unsigned, _) = split_signature(&signed).unwrap().unwrap();
        assert_eq!(statement_hash(unsigned), statement_hash(STATEMENT));
    }

    #[test]
    fn test_unsigned_is_none() {
        assert_eq!(parse_signed_statement(STATEMENT).unwrap(), None);
        assert!(!verify_signed_statement(STATEMENT));
    }

    #[test]
    fn test_tampered_signature() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        let start = signed.find("Signature: ").unwrap() + "Signature: ".len();
        let first = &signed[start..start + 1];
        let replacement = if first == "A" { "B" } else { "A" };
        let tampered = format!("{}{}{}", &signed[..start], replacement, &signed[start + 1..]);

        assert!(!verify_signed_statement(&tampered));
        let report = parse_signed_statement(&tampered).unwrap().unwrap().report();
        assert!(report.hash_matches);
        assert!(!report.signature_verified);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_tampered_statement() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        let tampered = signed.replace("hello", "hellO");
        let parsed = parse_signed_statement(&tampered).unwrap().unwrap();
        assert!(matches!(parsed.verify(), Err(CodecError::HashMismatch { .. })));
        let report = parsed.report();
        assert!(!report.hash_matches);
        assert!(!report.signature_verified);
    }

    #[test]
    fn test_build_with_text_keys() {
        let keypair = keypair();
        let signed = build_signed_statement(
            STATEMENT,
            &keypair.private_key(),
            &keypair.public_key().to_hex(),
        )
        .unwrap();
        assert!(verify_signed_statement(&signed));

        let other = Keypair::from_seed(&[8u8; 32]).public_key().to_url_safe();
        assert!(matches!(
            build_signed_statement(STATEMENT, &keypair.private_key(), &other),
            Err(CodecError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_malformed_block() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        let broken = signed.replace("Algorithm: Ed25519\n", "");
        assert!(matches!(
            parse_signed_statement(&broken),
            Err(CodecError::MalformedSignature(_))
        ));

        let other_algorithm = signed.replace("Algorithm: Ed25519", "Algorithm: RSA");
        assert!(matches!(
            parse_signed_statement(&other_algorithm),
            Err(CodecError::MalformedSignature(_))
        ));
        assert!(!verify_signed_statement(&other_algorithm));
    }

    #[test]
    fn test_cannot_sign_twice() {
        let signed = keypair().sign_statement(STATEMENT).unwrap();
        assert!(keypair().sign_statement(&signed).is_err());
    }
}
