//! Typed statement content.
//!
//! Each statement type is a plain struct implementing [`ContentCodec`]: a
//! field table plus conversions to and from raw [`FieldValues`]. Rendering
//! and parsing of the tab-indented block are shared (see [`crate::fields`]).
//!
//! [`StatementContent`] is the closed sum over all of them plus untyped
//! text; dispatch on the `Type:` label is a single exhaustive match.

mod bounty;
mod boycott;
mod dispute;
mod observation;
mod organisation;
mod pdf;
mod person;
mod poll;
mod quotation;
mod rating;
mod response;
mod vote;

pub use bounty::Bounty;
pub use boycott::Boycott;
pub use dispute::{DisputeAuthenticity, DisputeContent};
pub use observation::Observation;
pub use organisation::OrganisationVerification;
pub use pdf::PdfSigning;
pub use person::PersonVerification;
pub use poll::{Poll, PollScope, MAX_POLL_OPTIONS};
pub use quotation::Quotation;
pub use rating::{Rating, RatingValue};
pub use response::Response;
pub use vote::Vote;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodecError, Result};
use crate::fields::{parse_block, render_block, FieldSpec, FieldValues};
use crate::text::with_trailing_newline;
use crate::types::StatementType;

/// Prefix every typed content block starts with.
pub const TYPE_PREFIX: &str = "\n\tType: ";

/// Builder and parser for one statement type.
pub trait ContentCodec: Sized {
    const TYPE: StatementType;
    const FIELDS: &'static [FieldSpec];

    fn to_fields(&self) -> Result<FieldValues>;

    fn from_fields(fields: FieldValues) -> Result<Self>;

    /// Render the typed block, validating required fields and value domains.
    fn build_content(&self) -> Result<String> {
        render_block(Self::TYPE.label(), Self::FIELDS, &self.to_fields()?)
    }

    /// Parse a typed block produced by [`ContentCodec::build_content`].
    fn parse_content(content: &str) -> Result<Self> {
        Self::from_fields(parse_block(content, Self::TYPE.label(), Self::FIELDS)?)
    }
}

/// A confidence level between 0 and 1 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Parse the decimal form; only digits and dots are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return None;
        }
        s.parse().ok().and_then(Self::new)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) const CONFIDENCE_EXPECTED: &str = "a decimal between 0 and 1";

/// Any typed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedContent {
    Quotation(Quotation),
    OrganisationVerification(OrganisationVerification),
    PersonVerification(PersonVerification),
    Poll(Poll),
    Vote(Vote),
    Rating(Rating),
    DisputeAuthenticity(DisputeAuthenticity),
    DisputeContent(DisputeContent),
    Response(Response),
    SignPdf(PdfSigning),
    Bounty(Bounty),
    Observation(Observation),
    Boycott(Boycott),
}

impl TypedContent {
    pub fn statement_type(&self) -> StatementType {
        match self {
            Self::Quotation(_) => StatementType::Quotation,
            Self::OrganisationVerification(_) => StatementType::OrganisationVerification,
            Self::PersonVerification(_) => StatementType::PersonVerification,
            Self::Poll(_) => StatementType::Poll,
            Self::Vote(_) => StatementType::Vote,
            Self::Rating(_) => StatementType::Rating,
            Self::DisputeAuthenticity(_) => StatementType::DisputeAuthenticity,
            Self::DisputeContent(_) => StatementType::DisputeContent,
            Self::Response(_) => StatementType::Response,
            Self::SignPdf(_) => StatementType::SignPdf,
            Self::Bounty(_) => StatementType::Bounty,
            Self::Observation(_) => StatementType::Observation,
            Self::Boycott(_) => StatementType::Boycott,
        }
    }

    pub fn build(&self) -> Result<String> {
        match self {
            Self::Quotation(c) => c.build_content(),
            Self::OrganisationVerification(c) => c.build_content(),
            Self::PersonVerification(c) => c.build_content(),
            Self::Poll(c) => c.build_content(),
            Self::Vote(c) => c.build_content(),
            Self::Rating(c) => c.build_content(),
            Self::DisputeAuthenticity(c) => c.build_content(),
            Self::DisputeContent(c) => c.build_content(),
            Self::Response(c) => c.build_content(),
            Self::SignPdf(c) => c.build_content(),
            Self::Bounty(c) => c.build_content(),
            Self::Observation(c) => c.build_content(),
            Self::Boycott(c) => c.build_content(),
        }
    }

    /// Parse `content` as a block of the given type.
    pub fn parse(statement_type: StatementType, content: &str) -> Result<Self> {
        Ok(match statement_type {
            StatementType::Quotation => Self::Quotation(Quotation::parse_content(content)?),
            StatementType::OrganisationVerification => {
                Self::OrganisationVerification(OrganisationVerification::parse_content(content)?)
            }
            StatementType::PersonVerification => {
                Self::PersonVerification(PersonVerification::parse_content(content)?)
            }
            StatementType::Poll => Self::Poll(Poll::parse_content(content)?),
            StatementType::Vote => Self::Vote(Vote::parse_content(content)?),
            StatementType::Rating => Self::Rating(Rating::parse_content(content)?),
            StatementType::DisputeAuthenticity => {
                Self::DisputeAuthenticity(DisputeAuthenticity::parse_content(content)?)
            }
            StatementType::DisputeContent => {
                Self::DisputeContent(DisputeContent::parse_content(content)?)
            }
            StatementType::Response => Self::Response(Response::parse_content(content)?),
            StatementType::SignPdf => Self::SignPdf(PdfSigning::parse_content(content)?),
            StatementType::Bounty => Self::Bounty(Bounty::parse_content(content)?),
            StatementType::Observation => Self::Observation(Observation::parse_content(content)?),
            StatementType::Boycott => Self::Boycott(Boycott::parse_content(content)?),
        })
    }
}

/// The content of a statement: free text or a typed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementContent {
    Plain(String),
    Typed(TypedContent),
}

impl StatementContent {
    /// Decode content text, dispatching on its `Type:` line.
    pub fn parse(content: &str) -> Result<Self> {
        match classify(content)? {
            None => Ok(Self::Plain(content.to_string())),
            Some(statement_type) => Ok(Self::Typed(TypedContent::parse(statement_type, content)?)),
        }
    }

    /// Encode into content text ending in a newline.
    pub fn build(&self) -> Result<String> {
        match self {
            Self::Plain(text) => {
                if text.starts_with(TYPE_PREFIX) {
                    return Err(CodecError::content("Type", "plain content must not start with a type line"));
                }
                Ok(with_trailing_newline(text))
            }
            Self::Typed(typed) => typed.build(),
        }
    }

    pub fn statement_type(&self) -> Option<StatementType> {
        match self {
            Self::Plain(_) => None,
            Self::Typed(typed) => Some(typed.statement_type()),
        }
    }
}

impl From<TypedContent> for StatementContent {
    fn from(typed: TypedContent) -> Self {
        Self::Typed(typed)
    }
}

/// The raw label of the `Type:` line, if the content is typed.
pub fn declared_type_label(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(TYPE_PREFIX)?;
    Some(rest.split('\n').next().unwrap_or(rest))
}

/// The statement type declared by `content`; `None` for plain statements.
///
/// An unrecognized `Type:` label is an error, distinct from having none.
pub fn classify(content: &str) -> Result<Option<StatementType>> {
    match declared_type_label(content) {
        None => Ok(None),
        Some(label) => StatementType::from_label(label)
            .map(Some)
            .ok_or_else(|| CodecError::UnknownType(label.to_string())),
    }
}
