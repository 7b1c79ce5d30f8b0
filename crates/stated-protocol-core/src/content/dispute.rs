//! Disputes of a referenced statement.
//!
//! The two dispute kinds share their fields but carry different `Type:`
//! labels and fixed descriptions, so one never parses as the other.

use serde::{Deserialize, Serialize};

use super::{Confidence, ContentCodec, CONFIDENCE_EXPECTED};
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

fn dispute_fields(
    hash: &str,
    confidence: Option<Confidence>,
    reliability_policy: Option<&String>,
) -> FieldValues {
    let mut f = FieldValues::new();
    f.set("Hash of referenced statement", hash)
        .set_opt("Confidence", confidence)
        .set_opt("Reliability policy", reliability_policy);
    f
}

type DisputeParts = (String, Option<Confidence>, Option<String>);

fn dispute_from_fields(mut f: FieldValues) -> Result<DisputeParts> {
    Ok((
        f.require("Hash of referenced statement")?,
        f.take_with("Confidence", CONFIDENCE_EXPECTED, Confidence::parse)?,
        f.take("Reliability policy"),
    ))
}

/// Claims the referenced statement was not published by its stated author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeAuthenticity {
    pub hash: String,
    pub confidence: Option<Confidence>,
    pub reliability_policy: Option<String>,
}

impl ContentCodec for DisputeAuthenticity {
    const TYPE: StatementType = StatementType::DisputeAuthenticity;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::fixed(
            "Description",
            "We think that the referenced statement is not authentic.",
        ),
        FieldSpec::required("Hash of referenced statement"),
        FieldSpec::optional("Confidence"),
        FieldSpec::optional("Reliability policy"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        Ok(dispute_fields(&self.hash, self.confidence, self.reliability_policy.as_ref()))
    }

    fn from_fields(f: FieldValues) -> Result<Self> {
        let (hash, confidence, reliability_policy) = dispute_from_fields(f)?;
        Ok(Self {
            hash,
            confidence,
            reliability_policy,
        })
    }
}

/// Claims the content of the referenced statement is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeContent {
    pub hash: String,
    pub confidence: Option<Confidence>,
    pub reliability_policy: Option<String>,
}

impl ContentCodec for DisputeContent {
    const TYPE: StatementType = StatementType::DisputeContent;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::fixed(
            "Description",
            "We think that the content of the referenced statement is false.",
        ),
        FieldSpec::required("Hash of referenced statement"),
        FieldSpec::optional("Confidence"),
        FieldSpec::optional("Reliability policy"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        Ok(dispute_fields(&self.hash, self.confidence, self.reliability_policy.as_ref()))
    }

    fn from_fields(f: FieldValues) -> Result<Self> {
        let (hash, confidence, reliability_policy) = dispute_from_fields(f)?;
        Ok(Self {
            hash,
            confidence,
            reliability_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticity_text() {
        let dispute = DisputeAuthenticity {
            hash: "abc".into(),
            confidence: Confidence::new(0.5),
            reliability_policy: None,
        };
        assert_eq!(
            dispute.build_content().unwrap(),
            "\n\tType: Dispute statement authenticity\n\
             \tDescription: We think that the referenced statement is not authentic.\n\
             \tHash of referenced statement: abc\n\
             \tConfidence: 0.5\n"
        );
    }

    #[test]
    fn test_content_dispute_roundtrip() {
        let dispute = DisputeContent {
            hash: crate::hash::sha256("claim"),
            confidence: Confidence::new(1.0),
            reliability_policy: Some("https://verifier.example/policy".into()),
        };
        let text = dispute.build_content().unwrap();
        assert_eq!(DisputeContent::parse_content(&text).unwrap(), dispute);
        assert!(DisputeAuthenticity::parse_content(&text).is_err());
    }

    #[test]
    fn test_missing_hash() {
        let text = "\n\tType: Dispute statement content\n\
                    \tDescription: We think that the content of the referenced statement is false.\n";
        let err = DisputeContent::parse_content(text).unwrap_err();
        assert_eq!(err.field(), Some("Hash of referenced statement"));
    }
}
