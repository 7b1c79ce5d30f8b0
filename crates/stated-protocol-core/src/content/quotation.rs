//! Quotations of a verified author, optionally restated as a typed block.
//!
//! The paraphrase is the last line of the block. Free text stays on that
//! line; a typed paraphrase follows it as a complete typed block indented
//! one level deeper:
//!
//! ```text
//!
//! 	Type: Quotation
//! 	Original author: XYZ Company Inc.
//! 	Author verification: <hash of the verification statement>
//! 	Paraphrased statement:
//! 		Type: Rating
//! 		Subject name: example
//! 		Our rating: 2/5 Stars
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Confidence, ContentCodec, StatementContent, CONFIDENCE_EXPECTED};
use crate::datetime::{format_rfc1123, parse_rfc1123};
use crate::error::{CodecError, Result};
use crate::fields::{parse_block, render_block, FieldSpec, FieldValues};
use crate::types::StatementType;

const PARAPHRASE_LABEL: &str = "Paraphrased statement";
const PARAPHRASE_MARKER: &str = "\n\tParaphrased statement: ";

/// A statement quoted from another author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub original_author: String,
    /// Hash of the statement verifying the original author.
    pub author_verification: String,
    pub original_time: Option<DateTime<Utc>>,
    /// Where the quotation was found, usually a URL.
    pub source: Option<String>,
    /// Hash of a picture showing the original publication.
    pub picture: Option<String>,
    pub confidence: Option<Confidence>,
    pub quotation: Option<String>,
    /// A single line of free text, or a typed block.
    pub paraphrased_statement: Option<Box<StatementContent>>,
}

impl Quotation {
    pub fn new(original_author: impl Into<String>, author_verification: impl Into<String>) -> Self {
        Self {
            original_author: original_author.into(),
            author_verification: author_verification.into(),
            original_time: None,
            source: None,
            picture: None,
            confidence: None,
            quotation: None,
            paraphrased_statement: None,
        }
    }
}

impl ContentCodec for Quotation {
    const TYPE: StatementType = StatementType::Quotation;
    // The paraphrase is rendered and parsed outside the table.
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("Original author"),
        FieldSpec::required("Author verification"),
        FieldSpec::optional("Original publication time"),
        FieldSpec::optional("Source"),
        FieldSpec::optional("Picture proof"),
        FieldSpec::optional("Confidence"),
        FieldSpec::optional("Quotation"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set("Original author", &self.original_author)
            .set("Author verification", &self.author_verification)
            .set_opt("Original publication time", self.original_time.as_ref().map(format_rfc1123))
            .set_opt("Source", self.source.as_ref())
            .set_opt("Picture proof", self.picture.as_ref())
            .set_opt("Confidence", self.confidence)
            .set_opt("Quotation", self.quotation.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            original_author: f.require("Original author")?,
            author_verification: f.require("Author verification")?,
            original_time: f.take_with("Original publication time", "an RFC 1123 GMT time", parse_rfc1123)?,
            source: f.take("Source"),
            picture: f.take("Picture proof"),
            confidence: f.take_with("Confidence", CONFIDENCE_EXPECTED, Confidence::parse)?,
            quotation: f.take("Quotation"),
            paraphrased_statement: None,
        })
    }

    fn build_content(&self) -> Result<String> {
        let mut out = render_block(Self::TYPE.label(), Self::FIELDS, &self.to_fields()?)?;
        if let Some(paraphrase) = &self.paraphrased_statement {
            out.push_str(&render_paraphrase(paraphrase)?);
        }
        Ok(out)
    }

    fn parse_content(content: &str) -> Result<Self> {
        let (table, paraphrase) = match content.find(PARAPHRASE_MARKER) {
            Some(idx) => (
                &content[..=idx],
                Some(parse_paraphrase(&content[idx + PARAPHRASE_MARKER.len()..])?),
            ),
            None => (content, None),
        };
        let mut quotation = Self::from_fields(parse_block(table, Self::TYPE.label(), Self::FIELDS)?)?;
        quotation.paraphrased_statement = paraphrase.map(Box::new);
        Ok(quotation)
    }
}

fn render_paraphrase(paraphrase: &StatementContent) -> Result<String> {
    match paraphrase {
        StatementContent::Plain(text) => {
            if text.is_empty() {
                return Err(CodecError::content(PARAPHRASE_LABEL, "value is empty"));
            }
            if text.contains(['\n', '\r']) {
                return Err(CodecError::content(PARAPHRASE_LABEL, "value must be a single line"));
            }
            Ok(format!("\t{PARAPHRASE_LABEL}: {text}\n"))
        }
        StatementContent::Typed(typed) => {
            let block = typed.build()?;
            let mut out = format!("\t{PARAPHRASE_LABEL}: \n");
            for line in block.strip_prefix('\n').unwrap_or(&block).split_terminator('\n') {
                out.push('\t');
                out.push_str(line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Parse everything after `Paraphrased statement: `.
fn parse_paraphrase(rest: &str) -> Result<StatementContent> {
    let (value, nested) = rest
        .split_once('\n')
        .ok_or_else(|| CodecError::content(PARAPHRASE_LABEL, "block must end with a newline"))?;
    if !value.is_empty() {
        if !nested.is_empty() {
            return Err(CodecError::content(PARAPHRASE_LABEL, "must be the last line of the block"));
        }
        return Ok(StatementContent::Plain(value.to_string()));
    }
    if nested.is_empty() {
        return Err(CodecError::content(PARAPHRASE_LABEL, "value is empty"));
    }
    if !nested.ends_with('\n') {
        return Err(CodecError::content(PARAPHRASE_LABEL, "block must end with a newline"));
    }

    let mut block = String::from("\n");
    for line in nested.split_terminator('\n') {
        let line = line
            .strip_prefix('\t')
            .filter(|line| line.starts_with('\t'))
            .ok_or_else(|| CodecError::content(PARAPHRASE_LABEL, "nested block must be indented one level deeper"))?;
        block.push_str(line);
        block.push('\n');
    }
    match StatementContent::parse(&block)? {
        StatementContent::Plain(_) => Err(CodecError::content(PARAPHRASE_LABEL, "expected a typed block")),
        typed => Ok(typed),
    }
}
