use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// A call to boycott a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boycott {
    pub description: Option<String>,
    pub subject: String,
    pub subject_reference: Option<String>,
}

impl ContentCodec for Boycott {
    const TYPE: StatementType = StatementType::Boycott;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("Description"),
        FieldSpec::required("Subject"),
        FieldSpec::optional("Subject identity reference"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set_opt("Description", self.description.as_ref())
            .set("Subject", &self.subject)
            .set_opt("Subject identity reference", self.subject_reference.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            description: f.take("Description"),
            subject: f.require("Subject")?,
            subject_reference: f.take("Subject identity reference"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boycott_text() {
        let boycott = Boycott {
            description: None,
            subject: "Example Corp".into(),
            subject_reference: None,
        };
        let text = boycott.build_content().unwrap();
        assert_eq!(text, "\n\tType: Boycott\n\tSubject: Example Corp\n");
        assert_eq!(Boycott::parse_content(&text).unwrap(), boycott);
    }
}
