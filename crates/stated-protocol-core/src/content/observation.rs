use serde::{Deserialize, Serialize};

use super::{Confidence, ContentCodec, CONFIDENCE_EXPECTED};
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// An observed property of a subject, e.g. membership in an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub approach: Option<String>,
    pub confidence: Option<Confidence>,
    pub reliability_policy: Option<String>,
    pub subject: String,
    pub subject_reference: Option<String>,
    pub observation_reference: Option<String>,
    pub property: String,
    pub value: Option<String>,
}

impl Observation {
    pub fn new(subject: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            approach: None,
            confidence: None,
            reliability_policy: None,
            subject: subject.into(),
            subject_reference: None,
            observation_reference: None,
            property: property.into(),
            value: None,
        }
    }
}

impl ContentCodec for Observation {
    const TYPE: StatementType = StatementType::Observation;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("Approach"),
        FieldSpec::optional("Confidence"),
        FieldSpec::optional("Reliability policy"),
        FieldSpec::required("Subject"),
        FieldSpec::optional("Subject identity reference"),
        FieldSpec::optional("Observation reference"),
        FieldSpec::required("Observed property"),
        FieldSpec::optional("Observed value"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set_opt("Approach", self.approach.as_ref())
            .set_opt("Confidence", self.confidence)
            .set_opt("Reliability policy", self.reliability_policy.as_ref())
            .set("Subject", &self.subject)
            .set_opt("Subject identity reference", self.subject_reference.as_ref())
            .set_opt("Observation reference", self.observation_reference.as_ref())
            .set("Observed property", &self.property)
            .set_opt("Observed value", self.value.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            approach: f.take("Approach"),
            confidence: f.take_with("Confidence", CONFIDENCE_EXPECTED, Confidence::parse)?,
            reliability_policy: f.take("Reliability policy"),
            subject: f.require("Subject")?,
            subject_reference: f.take("Subject identity reference"),
            observation_reference: f.take("Observation reference"),
            property: f.require("Observed property")?,
            value: f.take("Observed value"),
        })
    }
}
