use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Confidence, ContentCodec, CONFIDENCE_EXPECTED};
use crate::datetime::{format_birth_date, parse_birth_date};
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// Verified facts about a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonVerification {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub city_of_birth: String,
    pub country_of_birth: String,
    pub job_title: Option<String>,
    pub employer: Option<String>,
    pub own_domain: Option<String>,
    pub foreign_domain: Option<String>,
    /// Hash of a picture of the person.
    pub picture: Option<String>,
    pub verification_method: Option<String>,
    pub confidence: Option<Confidence>,
    pub reliability_policy: Option<String>,
}

impl ContentCodec for PersonVerification {
    const TYPE: StatementType = StatementType::PersonVerification;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::fixed("Description", "We verified the following information about a person."),
        FieldSpec::required("Name"),
        FieldSpec::required("Date of birth"),
        FieldSpec::required("City of birth"),
        FieldSpec::required("Country of birth"),
        FieldSpec::optional("Job title"),
        FieldSpec::optional("Employer"),
        FieldSpec::optional("Owner of the domain"),
        FieldSpec::optional("Foreign domain used for publishing statements"),
        FieldSpec::optional("Picture"),
        FieldSpec::optional("Verification method"),
        FieldSpec::optional("Confidence"),
        FieldSpec::optional("Reliability policy"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set("Name", &self.name)
            .set("Date of birth", format_birth_date(&self.date_of_birth))
            .set("City of birth", &self.city_of_birth)
            .set("Country of birth", &self.country_of_birth)
            .set_opt("Job title", self.job_title.as_ref())
            .set_opt("Employer", self.employer.as_ref())
            .set_opt("Owner of the domain", self.own_domain.as_ref())
            .set_opt("Foreign domain used for publishing statements", self.foreign_domain.as_ref())
            .set_opt("Picture", self.picture.as_ref())
            .set_opt("Verification method", self.verification_method.as_ref())
            .set_opt("Confidence", self.confidence)
            .set_opt("Reliability policy", self.reliability_policy.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            name: f.require("Name")?,
            date_of_birth: f.require_with("Date of birth", "a date like '01 Jan 1990'", parse_birth_date)?,
            city_of_birth: f.require("City of birth")?,
            country_of_birth: f.require("Country of birth")?,
            job_title: f.take("Job title"),
            employer: f.take("Employer"),
            own_domain: f.take("Owner of the domain"),
            foreign_domain: f.take("Foreign domain used for publishing statements"),
            picture: f.take("Picture"),
            verification_method: f.take("Verification method"),
            confidence: f.take_with("Confidence", CONFIDENCE_EXPECTED, Confidence::parse)?,
            reliability_policy: f.take("Reliability policy"),
        })
    }
}
