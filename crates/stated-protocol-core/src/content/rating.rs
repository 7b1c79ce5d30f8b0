use serde::{Deserialize, Serialize};
use std::fmt;

use super::ContentCodec;
use crate::constants::RatingSubjectType;
use crate::error::{CodecError, Result};
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// A star rating from 1 to 5, written as `N/5 Stars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    fn parse(s: &str) -> Option<Self> {
        let stars = s.strip_suffix("/5 Stars")?;
        if stars.len() != 1 {
            return None;
        }
        stars.parse().ok().and_then(Self::new)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5 Stars", self.0)
    }
}

/// A rating of an organisation, product, publication or similar subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub subject_type: Option<RatingSubjectType>,
    pub subject_name: String,
    /// URL that identifies the subject.
    pub subject_reference: Option<String>,
    pub document_file_hash: Option<String>,
    /// The quality being rated, e.g. "Safety".
    pub quality: Option<String>,
    pub rating: RatingValue,
    pub comment: Option<String>,
}

impl Rating {
    pub fn new(subject_name: impl Into<String>, rating: RatingValue) -> Self {
        Self {
            subject_type: None,
            subject_name: subject_name.into(),
            subject_reference: None,
            document_file_hash: None,
            quality: None,
            rating,
            comment: None,
        }
    }
}

impl ContentCodec for Rating {
    const TYPE: StatementType = StatementType::Rating;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("Subject type"),
        FieldSpec::required("Subject name"),
        FieldSpec::optional("URL that identifies the subject"),
        FieldSpec::optional("Document file hash"),
        FieldSpec::optional("Rated quality"),
        FieldSpec::required("Our rating"),
        FieldSpec::optional("Comment"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        if RatingValue::new(self.rating.0).is_none() {
            return Err(CodecError::content("Our rating", "rating must be between 1 and 5"));
        }
        let mut f = FieldValues::new();
        f.set_opt("Subject type", self.subject_type)
            .set("Subject name", &self.subject_name)
            .set_opt("URL that identifies the subject", self.subject_reference.as_ref())
            .set_opt("Document file hash", self.document_file_hash.as_ref())
            .set_opt("Rated quality", self.quality.as_ref())
            .set("Our rating", self.rating.to_string())
            .set_opt("Comment", self.comment.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            subject_type: f.take_with("Subject type", "a known subject type", RatingSubjectType::from_label)?,
            subject_name: f.require("Subject name")?,
            subject_reference: f.take("URL that identifies the subject"),
            document_file_hash: f.take("Document file hash"),
            quality: f.take("Rated quality"),
            rating: f.require_with("Our rating", "'N/5 Stars' with N from 1 to 5", RatingValue::parse)?,
            comment: f.take("Comment"),
        })
    }
}
