//! Protocol constants and closed value sets.
//!
//! These tables are read-only data shared by the builders, the parsers and
//! any host that renders choices for them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a statement's canonical text, in characters.
pub const MAX_STATEMENT_LENGTH: usize = 3000;

/// Languages the reference clients offer translations for.
///
/// Statements may carry any two or three letter code; this list only
/// drives host-side hints.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "ar", "zh", "fr"];

/// Legal form of a verified organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalForm {
    LocalGovernment,
    StateGovernment,
    ForeignAffairsMinistry,
    Corporation,
}

impl LegalForm {
    pub const ALL: [LegalForm; 4] = [
        Self::LocalGovernment,
        Self::StateGovernment,
        Self::ForeignAffairsMinistry,
        Self::Corporation,
    ];

    /// The text written into statements.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalGovernment => "local government",
            Self::StateGovernment => "state government",
            Self::ForeignAffairsMinistry => "foreign affairs ministry",
            Self::Corporation => "corporation",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for LegalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headcount bucket used for employee counts and populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeopleCount {
    UpTo10,
    UpTo100,
    UpTo1000,
    UpTo10k,
    UpTo100k,
    Over100k,
    Over1m,
    Over10m,
}

impl PeopleCount {
    pub const ALL: [PeopleCount; 8] = [
        Self::UpTo10,
        Self::UpTo100,
        Self::UpTo1000,
        Self::UpTo10k,
        Self::UpTo100k,
        Self::Over100k,
        Self::Over1m,
        Self::Over10m,
    ];

    /// Lower bound of the bucket.
    pub fn min_count(self) -> u64 {
        match self {
            Self::UpTo10 => 0,
            Self::UpTo100 => 10,
            Self::UpTo1000 => 100,
            Self::UpTo10k => 1_000,
            Self::UpTo100k => 10_000,
            Self::Over100k => 100_000,
            Self::Over1m => 1_000_000,
            Self::Over10m => 10_000_000,
        }
    }

    /// The text written into statements.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpTo10 => "0-10",
            Self::UpTo100 => "10-100",
            Self::UpTo1000 => "100-1000",
            Self::UpTo10k => "1000-10,000",
            Self::UpTo100k => "10,000-100,000",
            Self::Over100k => "100,000+",
            Self::Over1m => "1,000,000+",
            Self::Over10m => "10,000,000+",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s)
    }

    /// The bucket a concrete count falls into.
    pub fn from_min_count(n: u64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|b| n >= b.min_count())
            .unwrap_or(Self::UpTo10)
    }
}

impl fmt::Display for PeopleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of thing a rating is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingSubjectType {
    Organisation,
    PolicyProposal,
    TreatyDraft,
    ResearchPublication,
    Regulation,
    Product,
}

impl RatingSubjectType {
    pub const ALL: [RatingSubjectType; 6] = [
        Self::Organisation,
        Self::PolicyProposal,
        Self::TreatyDraft,
        Self::ResearchPublication,
        Self::Regulation,
        Self::Product,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organisation => "Organisation",
            Self::PolicyProposal => "Policy proposal",
            Self::TreatyDraft => "Treaty draft",
            Self::ResearchPublication => "Research publication",
            Self::Regulation => "Regulation",
            Self::Product => "Product",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for RatingSubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
