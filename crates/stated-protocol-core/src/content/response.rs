use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// A reply to another statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Hash of the statement being answered.
    pub hash: String,
    pub response: String,
}

impl ContentCodec for Response {
    const TYPE: StatementType = StatementType::Response;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("Hash of referenced statement"),
        FieldSpec::required("Response"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set("Hash of referenced statement", &self.hash)
            .set("Response", &self.response);
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            hash: f.require("Hash of referenced statement")?,
            response: f.require("Response")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_roundtrip() {
        let response = Response {
            hash: crate::hash::sha256("original"),
            response: "We disagree: the figures are from 2019.".into(),
        };
        let text = response.build_content().unwrap();
        assert!(text.starts_with("\n\tType: Response\n\tHash of referenced statement: "));
        assert_eq!(Response::parse_content(&text).unwrap(), response);
    }

    #[test]
    fn test_multiline_response_rejected() {
        let response = Response {
            hash: "h".into(),
            response: "line one\nline two".into(),
        };
        assert_eq!(response.build_content().unwrap_err().field(), Some("Response"));
    }
}
