use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::StatementType;

/// A public offer of a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub motivation: Option<String>,
    /// What an entity must do to earn the reward.
    pub bounty: String,
    pub reward: String,
    pub judge: String,
    pub judge_pay: Option<String>,
}

impl ContentCodec for Bounty {
    const TYPE: StatementType = StatementType::Bounty;
    // "maxium" is part of the published label.
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("In order to"),
        FieldSpec::required("We will reward any entity that"),
        FieldSpec::required("The reward is"),
        FieldSpec::required("In case of dispute, bounty claims are judged by"),
        FieldSpec::optional("The judge will be paid per investigated case with a maxium of"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set_opt("In order to", self.motivation.as_ref())
            .set("We will reward any entity that", &self.bounty)
            .set("The reward is", &self.reward)
            .set("In case of dispute, bounty claims are judged by", &self.judge)
            .set_opt(
                "The judge will be paid per investigated case with a maxium of",
                self.judge_pay.as_ref(),
            );
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            motivation: f.take("In order to"),
            bounty: f.require("We will reward any entity that")?,
            reward: f.require("The reward is")?,
            judge: f.require("In case of dispute, bounty claims are judged by")?,
            judge_pay: f.take("The judge will be paid per investigated case with a maxium of"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounty_roundtrip() {
        let bounty = Bounty {
            motivation: Some("improve security".into()),
            bounty: "reports a vulnerability in our API".into(),
            reward: "1000 EUR".into(),
            judge: "security.example".into(),
            judge_pay: Some("100 EUR".into()),
        };
        let text = bounty.build_content().unwrap();
        assert!(text.contains("\tIn case of dispute, bounty claims are judged by: security.example\n"));
        assert_eq!(Bounty::parse_content(&text).unwrap(), bounty);
    }

    #[test]
    fn test_bounty_requires_reward() {
        let bounty = Bounty {
            motivation: None,
            bounty: "finds a bug".into(),
            reward: String::new(),
            judge: "judge.example".into(),
            judge_pay: None,
        };
        assert_eq!(bounty.build_content().unwrap_err().field(), Some("The reward is"));
    }
}
