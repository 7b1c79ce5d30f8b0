//! Statements: the envelope around a content block.
//!
//! A statement is built once from caller-supplied fields and is immutable
//! afterwards; superseding it means publishing a new statement that names
//! the old one's hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::{classify, StatementContent};
use crate::datetime::truncate_to_seconds;
use crate::error::Result;
use crate::hash::sha256;
use crate::signed::{split_signature, SignatureBlock};
use crate::types::{StatementType, PLAIN_STATEMENT_SLUG};
use crate::version;

/// The fields of a statement envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The publishing domain, authenticated outside the codec.
    pub domain: String,
    /// Display name of the publishing entity.
    pub author: String,
    /// Person authorized to sign on the author's behalf.
    pub representative: Option<String>,
    pub time: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Plain text, or a typed block starting with `\n\tType: `.
    pub content: String,
    /// Hash of the statement this one replaces.
    pub superseded_statement: Option<String>,
    /// Language code to translated content.
    pub translations: BTreeMap<String, String>,
    /// Attachment names of the form `<hash>.<ext>`.
    pub attachments: Vec<String>,
}

impl Statement {
    pub fn builder(domain: impl Into<String>, author: impl Into<String>, time: DateTime<Utc>) -> StatementBuilder {
        StatementBuilder::new(domain, author, time)
    }

    /// Canonical text in the current format version.
    pub fn to_text(&self) -> Result<String> {
        build_statement(self)
    }

    /// Hash of the canonical text.
    pub fn hash(&self) -> Result<String> {
        self.to_text().map(|text| statement_hash(&text))
    }

    /// The declared type of the content, `None` for plain statements.
    pub fn statement_type(&self) -> Result<Option<StatementType>> {
        classify(&self.content)
    }

    /// Decode the content block.
    pub fn parse_content(&self) -> Result<StatementContent> {
        StatementContent::parse(&self.content)
    }
}

/// Builder for statements.
///
/// Values are normalized on the way in: tags are trimmed and empty tags
/// dropped, empty optional values are treated as absent, and the time is
/// truncated to whole seconds.
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    statement: Statement,
}

impl StatementBuilder {
    pub fn new(domain: impl Into<String>, author: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            statement: Statement {
                domain: domain.into(),
                author: author.into(),
                representative: None,
                time: truncate_to_seconds(time),
                tags: Vec::new(),
                content: String::new(),
                superseded_statement: None,
                translations: BTreeMap::new(),
                attachments: Vec::new(),
            },
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.statement.content = content.into();
        self
    }

    pub fn representative(mut self, representative: impl Into<String>) -> Self {
        self.statement.representative = non_empty(representative.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let tag = tag.trim();
        if !tag.is_empty() {
            self.statement.tags.push(tag.to_string());
        }
        self
    }

    pub fn tags<I, T>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        tags.into_iter().fold(self, |builder, tag| builder.tag(tag))
    }

    pub fn superseded_statement(mut self, hash: impl Into<String>) -> Self {
        self.statement.superseded_statement = non_empty(hash.into());
        self
    }

    pub fn translation(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.statement.translations.insert(language.into(), text.into());
        self
    }

    pub fn attachment(mut self, name: impl Into<String>) -> Self {
        self.statement.attachments.push(name.into());
        self
    }

    /// The normalized statement, not yet checked against the format.
    pub fn statement(self) -> Statement {
        self.statement
    }

    /// Encode with the current format version.
    pub fn build(self) -> Result<String> {
        build_statement(&self.statement)
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

/// Encode a statement with the current format version.
pub fn build_statement(statement: &Statement) -> Result<String> {
    version::current().encode(statement)
}

/// SHA-256 of statement text, URL-safe base64.
pub fn statement_hash(text: &str) -> String {
    sha256(text)
}

/// Options for [`parse_statement`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Accept statements without a `Format version` line.
    pub allow_no_version: bool,
}

impl ParseOptions {
    pub fn allow_no_version() -> Self {
        Self {
            allow_no_version: true,
        }
    }
}

/// A successfully parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub statement: Statement,
    /// Type declared by the content; `None` for plain statements.
    pub statement_type: Option<StatementType>,
    /// Version of the grammar that decoded the text.
    pub format_version: &'static str,
    /// Value of the `Format version` line, if present.
    pub declared_version: Option<String>,
    /// The verified signature block, for signed text.
    pub signature: Option<SignatureBlock>,
    /// Hash of the unsigned statement text.
    pub hash: String,
}

impl ParsedStatement {
    /// Lower-case type identifier, e.g. `sign_pdf`; `statement` for plain text.
    pub fn type_slug(&self) -> String {
        self.statement_type
            .map_or_else(|| PLAIN_STATEMENT_SLUG.to_string(), StatementType::slug)
    }
}

/// Parse statement text, signed or not.
///
/// If a signature block is present it is split off and verified first; the
/// remaining text is decoded with the grammar its `Format version` selects.
pub fn parse_statement(text: &str, options: ParseOptions) -> Result<ParsedStatement> {
    let (unsigned, signature) = match split_signature(text)? {
        Some((unsigned, block)) => {
            block.verify(unsigned)?;
            (unsigned, Some(block))
        }
        None => (text, None),
    };

    let (grammar, decoded) = version::decode(unsigned, options)?;
    let statement_type = classify(&decoded.statement.content)?;

    Ok(ParsedStatement {
        statement: decoded.statement,
        statement_type,
        format_version: grammar.version,
        declared_version: decoded.declared_version,
        signature,
        hash: statement_hash(unsigned),
    })
}
