use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// A vote on a poll, referencing the poll statement by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub poll_hash: String,
    /// The poll question, repeated for readability.
    pub poll: String,
    pub vote: String,
}

impl ContentCodec for Vote {
    const TYPE: StatementType = StatementType::Vote;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("Poll id"),
        FieldSpec::required("Poll"),
        FieldSpec::required("Option"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set("Poll id", &self.poll_hash)
            .set("Poll", &self.poll)
            .set("Option", &self.vote);
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            poll_hash: f.require("Poll id")?,
            poll: f.require("Poll")?,
            vote: f.require("Option")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_text() {
        let vote = Vote {
            poll_hash: "abc".into(),
            poll: "Lunch?".into(),
            vote: "Pizza".into(),
        };
        let text = vote.build_content().unwrap();
        assert_eq!(text, "\n\tType: Vote\n\tPoll id: abc\n\tPoll: Lunch?\n\tOption: Pizza\n");
        assert_eq!(Vote::parse_content(&text).unwrap(), vote);
    }

    #[test]
    fn test_vote_requires_option() {
        let text = "\n\tType: Vote\n\tPoll id: abc\n\tPoll: Lunch?\n";
        assert_eq!(Vote::parse_content(text).unwrap_err().field(), Some("Option"));
    }
}
