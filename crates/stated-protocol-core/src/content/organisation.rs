use serde::{Deserialize, Serialize};

use super::{Confidence, ContentCodec, CONFIDENCE_EXPECTED};
use crate::constants::{LegalForm, PeopleCount};
use crate::error::{CodecError, Result};
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// Verified facts about an organisation, published by a verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationVerification {
    /// Full name as in the business register.
    pub name: String,
    pub english_name: Option<String>,
    pub country: String,
    pub legal_form: LegalForm,
    /// Domain owned by the organisation.
    pub domain: Option<String>,
    /// Domain the organisation uses for publishing without owning it.
    pub foreign_domain: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub serial_number: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub population: Option<PeopleCount>,
    /// Hash of the logo image.
    pub logo: Option<String>,
    pub employee_count: Option<PeopleCount>,
    pub reliability_policy: Option<String>,
    pub confidence: Option<Confidence>,
}

impl OrganisationVerification {
    /// Minimal verification; set the remaining fields directly.
    pub fn new(name: impl Into<String>, country: impl Into<String>, legal_form: LegalForm) -> Self {
        Self {
            name: name.into(),
            english_name: None,
            country: country.into(),
            legal_form,
            domain: None,
            foreign_domain: None,
            department: None,
            province: None,
            serial_number: None,
            city: None,
            latitude: None,
            longitude: None,
            population: None,
            logo: None,
            employee_count: None,
            reliability_policy: None,
            confidence: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CodecError::content("Name", "required field is missing"));
        }
        if self.country.trim().is_empty() {
            return Err(CodecError::content("Country", "required field is missing"));
        }
        let has_domain = |d: &Option<String>| d.as_deref().is_some_and(|d| !d.is_empty());
        if !has_domain(&self.domain) && !has_domain(&self.foreign_domain) {
            return Err(CodecError::content(
                "Owner of the domain",
                "either the owned or the foreign publishing domain is required",
            ));
        }
        for (label, coordinate, bound) in [
            ("Latitude", self.latitude, 90.0),
            ("Longitude", self.longitude, 180.0),
        ] {
            if coordinate.is_some_and(|c| !(-bound..=bound).contains(&c)) {
                return Err(CodecError::content(label, "coordinate out of range"));
            }
        }
        Ok(())
    }
}

impl ContentCodec for OrganisationVerification {
    const TYPE: StatementType = StatementType::OrganisationVerification;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::fixed(
            "Description",
            "We verified the following information about an organisation.",
        ),
        FieldSpec::required("Name"),
        FieldSpec::optional("English name"),
        FieldSpec::required("Country"),
        FieldSpec::required("Legal form").with_aliases(&["Legal entity"]),
        FieldSpec::optional("Owner of the domain"),
        FieldSpec::optional("Foreign domain used for publishing statements"),
        FieldSpec::optional("Department using the domain"),
        FieldSpec::optional("Province or state"),
        FieldSpec::optional("Business register number"),
        FieldSpec::optional("City"),
        FieldSpec::optional("Latitude"),
        FieldSpec::optional("Longitude"),
        FieldSpec::optional("Population"),
        FieldSpec::optional("Logo"),
        FieldSpec::optional("Employee count"),
        FieldSpec::optional("Reliability policy"),
        FieldSpec::optional("Confidence"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        self.validate()?;
        let mut f = FieldValues::new();
        f.set("Name", &self.name)
            .set_opt("English name", self.english_name.as_ref())
            .set("Country", &self.country)
            .set("Legal form", self.legal_form.as_str())
            .set_opt("Owner of the domain", self.domain.as_ref())
            .set_opt("Foreign domain used for publishing statements", self.foreign_domain.as_ref())
            .set_opt("Department using the domain", self.department.as_ref())
            .set_opt("Province or state", self.province.as_ref())
            .set_opt("Business register number", self.serial_number.as_ref())
            .set_opt("City", self.city.as_ref())
            .set_opt("Latitude", self.latitude)
            .set_opt("Longitude", self.longitude)
            .set_opt("Population", self.population)
            .set_opt("Logo", self.logo.as_ref())
            .set_opt("Employee count", self.employee_count)
            .set_opt("Reliability policy", self.reliability_policy.as_ref())
            .set_opt("Confidence", self.confidence);
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        let parsed = Self {
            name: f.require("Name")?,
            english_name: f.take("English name"),
            country: f.require("Country")?,
            legal_form: f.require_with("Legal form", "a known legal form", LegalForm::from_label)?,
            domain: f.take("Owner of the domain"),
            foreign_domain: f.take("Foreign domain used for publishing statements"),
            department: f.take("Department using the domain"),
            province: f.take("Province or state"),
            serial_number: f.take("Business register number"),
            city: f.take("City"),
            latitude: f.take_with("Latitude", "a number", |s| s.parse().ok())?,
            longitude: f.take_with("Longitude", "a number", |s| s.parse().ok())?,
            population: f.take_with("Population", "a people count bucket", PeopleCount::from_label)?,
            logo: f.take("Logo"),
            employee_count: f.take_with("Employee count", "a people count bucket", PeopleCount::from_label)?,
            reliability_policy: f.take("Reliability policy"),
            confidence: f.take_with("Confidence", CONFIDENCE_EXPECTED, Confidence::parse)?,
        };
        parsed.validate()?;
        Ok(parsed)
    }
}
