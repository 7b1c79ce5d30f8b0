use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::constants::LegalForm;
use crate::datetime::{format_rfc1123, parse_rfc1123};
use crate::error::{CodecError, Result};
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// Number of answer slots a poll can carry.
pub const MAX_POLL_OPTIONS: usize = 5;

const OPTION_LABELS: [&str; MAX_POLL_OPTIONS] = ["Option 1", "Option 2", "Option 3", "Option 4", "Option 5"];

const SCOPE_LABEL: &str = "Who can vote";

const SCOPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("Description"),
    FieldSpec::optional("Country scope"),
    FieldSpec::optional("City scope"),
    FieldSpec::optional("Legal form scope"),
    FieldSpec::optional("Domain scope"),
    FieldSpec::optional("All entities with the following property"),
    FieldSpec::optional("With the value"),
    FieldSpec::optional("As observed by"),
    FieldSpec::optional("Link to query defining who can vote"),
];

/// Eligibility rules of a poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollScope {
    /// Free-text description of who can vote. Required when a scope is given.
    pub description: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub legal_form: Option<LegalForm>,
    pub domain_scope: Vec<String>,
    /// Only entities with this observed property may vote.
    pub required_property: Option<String>,
    pub required_property_value: Option<String>,
    /// Whose observations of the property count.
    pub required_property_observer: Option<String>,
    pub scope_query_link: Option<String>,
}

impl PollScope {
    fn to_fields(&self) -> Result<FieldValues> {
        if self.description.trim().is_empty() {
            return Err(CodecError::content(
                "Description",
                "a poll scope must describe who can vote",
            ));
        }
        if self.domain_scope.iter().any(|d| d.is_empty() || d.contains(',')) {
            return Err(CodecError::content(
                "Domain scope",
                "domains must be non-empty and must not contain commas",
            ));
        }
        let mut f = FieldValues::new();
        f.set("Description", &self.description)
            .set_opt("Country scope", self.country.as_ref())
            .set_opt("City scope", self.city.as_ref())
            .set_opt("Legal form scope", self.legal_form)
            .set_opt(
                "Domain scope",
                (!self.domain_scope.is_empty()).then(|| self.domain_scope.join(", ")),
            )
            .set_opt("All entities with the following property", self.required_property.as_ref())
            .set_opt("With the value", self.required_property_value.as_ref())
            .set_opt("As observed by", self.required_property_observer.as_ref())
            .set_opt("Link to query defining who can vote", self.scope_query_link.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            description: f.require("Description")?,
            country: f.take("Country scope"),
            city: f.take("City scope"),
            legal_form: f.take_with("Legal form scope", "a known legal form", LegalForm::from_label)?,
            domain_scope: f
                .take("Domain scope")
                .map(|s| s.split(", ").map(str::to_string).collect())
                .unwrap_or_default(),
            required_property: f.take("All entities with the following property"),
            required_property_value: f.take("With the value"),
            required_property_observer: f.take("As observed by"),
            scope_query_link: f.take("Link to query defining who can vote"),
        })
    }
}

/// A poll with up to five answer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Nodes whose agreement finalizes the outcome.
    pub judges: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub poll: String,
    pub options: Vec<String>,
    /// Whether votes outside the listed options are accepted.
    pub allow_arbitrary_vote: Option<bool>,
    pub scope: Option<PollScope>,
}

impl Poll {
    pub fn new(poll: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            judges: None,
            deadline: None,
            poll: poll.into(),
            options,
            allow_arbitrary_vote: None,
            scope: None,
        }
    }

    fn validate_options(&self) -> Result<()> {
        if self.options.len() > MAX_POLL_OPTIONS {
            return Err(CodecError::content(
                "Option 6",
                format!("a poll has at most {MAX_POLL_OPTIONS} options"),
            ));
        }
        if let Some(i) = self.options.iter().position(|o| o.is_empty()) {
            return Err(CodecError::content(OPTION_LABELS[i], "option text is empty"));
        }
        if self.options.len() < 2 && self.allow_arbitrary_vote != Some(true) {
            return Err(CodecError::content(
                OPTION_LABELS[self.options.len()],
                "at least two options are required unless free text votes are allowed",
            ));
        }
        Ok(())
    }
}

impl ContentCodec for Poll {
    const TYPE: StatementType = StatementType::Poll;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("The poll outcome is finalized when the following nodes agree"),
        FieldSpec::optional("Voting deadline"),
        FieldSpec::required("Poll"),
        FieldSpec::optional("Option 1"),
        FieldSpec::optional("Option 2"),
        FieldSpec::optional("Option 3"),
        FieldSpec::optional("Option 4"),
        FieldSpec::optional("Option 5"),
        FieldSpec::optional("Allow free text votes"),
        FieldSpec::section(SCOPE_LABEL, SCOPE_FIELDS),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        self.validate_options()?;
        let mut f = FieldValues::new();
        f.set_opt(
            "The poll outcome is finalized when the following nodes agree",
            self.judges.as_ref(),
        )
        .set_opt("Voting deadline", self.deadline.as_ref().map(format_rfc1123))
        .set("Poll", &self.poll);
        for (label, option) in OPTION_LABELS.into_iter().zip(&self.options) {
            f.set(label, option);
        }
        f.set_opt(
            "Allow free text votes",
            self.allow_arbitrary_vote.map(|allow| if allow { "Yes" } else { "No" }),
        );
        if let Some(scope) = &self.scope {
            f.set_section(SCOPE_LABEL, scope.to_fields()?);
        }
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        let judges = f.take("The poll outcome is finalized when the following nodes agree");
        let deadline = f.take_with("Voting deadline", "an RFC 1123 GMT time", parse_rfc1123)?;
        let poll = f.require("Poll")?;

        let mut options = Vec::new();
        let mut gap: Option<&'static str> = None;
        for label in OPTION_LABELS {
            match f.take(label) {
                Some(option) => {
                    if let Some(missing) = gap {
                        return Err(CodecError::content(missing, "options must be numbered without gaps"));
                    }
                    options.push(option);
                }
                None => {
                    gap.get_or_insert(label);
                }
            }
        }

        let allow_arbitrary_vote = f.take_with("Allow free text votes", "'Yes' or 'No'", |s| match s {
            "Yes" => Some(true),
            "No" => Some(false),
            _ => None,
        })?;
        let scope = f.take_section(SCOPE_LABEL).map(PollScope::from_fields).transpose()?;

        let parsed = Self {
            judges,
            deadline,
            poll,
            options,
            allow_arbitrary_vote,
            scope,
        };
        parsed.validate_options()?;
        Ok(parsed)
    }
}
