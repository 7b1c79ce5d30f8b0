//! Strong type definitions for statements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};
use crate::hash::Sha256Hash;

/// The closed set of typed statement kinds.
///
/// A statement whose content has no `Type:` line is a plain statement and has
/// no `StatementType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    Quotation,
    OrganisationVerification,
    PersonVerification,
    Poll,
    Vote,
    Rating,
    DisputeAuthenticity,
    DisputeContent,
    Response,
    SignPdf,
    Bounty,
    Observation,
    Boycott,
}

/// Slug reported for statements without a `Type:` line.
pub const PLAIN_STATEMENT_SLUG: &str = "statement";

impl StatementType {
    pub const ALL: [StatementType; 13] = [
        Self::Quotation,
        Self::OrganisationVerification,
        Self::PersonVerification,
        Self::Poll,
        Self::Vote,
        Self::Rating,
        Self::DisputeAuthenticity,
        Self::DisputeContent,
        Self::Response,
        Self::SignPdf,
        Self::Bounty,
        Self::Observation,
        Self::Boycott,
    ];

    /// The `Type:` label as written in content.
    pub fn label(self) -> &'static str {
        match self {
            Self::Quotation => "Quotation",
            Self::OrganisationVerification => "Organisation verification",
            Self::PersonVerification => "Person verification",
            Self::Poll => "Poll",
            Self::Vote => "Vote",
            Self::Rating => "Rating",
            Self::DisputeAuthenticity => "Dispute statement authenticity",
            Self::DisputeContent => "Dispute statement content",
            Self::Response => "Response",
            Self::SignPdf => "Sign PDF",
            Self::Bounty => "Bounty",
            Self::Observation => "Observation",
            Self::Boycott => "Boycott",
        }
    }

    /// Lower-case identifier with spaces replaced by underscores.
    pub fn slug(self) -> String {
        slugify(self.label())
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-case a type label and replace spaces with underscores.
pub fn slugify(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// An attachment reference of the form `<urlsafe-sha256>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attachment {
    hash: Sha256Hash,
    extension: String,
}

impl Attachment {
    /// Name the given bytes.
    pub fn for_bytes(bytes: &[u8], extension: &str) -> Result<Self> {
        check_extension(extension)?;
        Ok(Self {
            hash: Sha256Hash::digest(bytes),
            extension: extension.to_string(),
        })
    }

    pub fn parse(name: &str) -> Result<Self> {
        let (hash, extension) = name.split_once('.').ok_or_else(|| {
            CodecError::InvalidEncoding(format!("attachment '{name}' has no extension"))
        })?;
        if hash.len() != 43 || hash.contains(['+', '/', '=']) {
            return Err(CodecError::InvalidEncoding(format!(
                "attachment '{name}' is not named by a URL-safe hash"
            )));
        }
        check_extension(extension)?;
        Ok(Self {
            hash: Sha256Hash::parse(hash)?,
            extension: extension.to_string(),
        })
    }

    pub fn hash(&self) -> &Sha256Hash {
        &self.hash
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Check fetched bytes against the hash in the name.
    pub fn verify(&self, bytes: &[u8]) -> bool {
        self.hash.matches(bytes)
    }
}

fn check_extension(extension: &str) -> Result<()> {
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CodecError::InvalidEncoding(format!(
            "invalid attachment extension '{extension}'"
        )));
    }
    Ok(())
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.hash.to_url_safe(), self.extension)
    }
}

impl FromStr for Attachment {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
