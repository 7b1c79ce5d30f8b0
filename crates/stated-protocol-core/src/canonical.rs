//! Canonical text encoding of the statement envelope.
//!
//! A format version is described by an [`EnvelopeGrammar`]: the ordered
//! header lines it understands, the label that introduces the content and
//! the time syntax it accepts. Encoding and decoding both walk that table,
//! so registering a version means writing a table, not a parser.
//!
//! Rules shared by every grammar:
//! - one `Label: value` line per present header field, in table order
//! - list values are joined with `, `
//! - the content follows `<content label>: ` and ends with a newline
//! - translations, when the grammar has them, follow the content as
//!   `Translation <lang>: <text>` blocks in the order the header declares;
//!   the newline closing a block is framing and is not part of the text
//! - a statement never contains a blank line and is at most
//!   [`MAX_STATEMENT_LENGTH`] characters long

use std::collections::BTreeMap;

use crate::constants::MAX_STATEMENT_LENGTH;
use crate::datetime::{format_rfc1123, parse_lenient, parse_rfc1123, truncate_to_seconds};
use crate::error::{CodecError, Result};
use crate::signed::signature_marker;
use crate::statement::Statement;
use crate::text::{is_language_code, translation_marker, translation_prefix, with_trailing_newline};
use crate::types::Attachment;

/// Envelope labels.
pub mod labels {
    pub const DOMAIN: &str = "Publishing domain";
    pub const AUTHOR: &str = "Author";
    pub const REPRESENTATIVE: &str = "Authorized signing representative";
    pub const TIME: &str = "Time";
    pub const TAGS: &str = "Tags";
    pub const FORMAT_VERSION: &str = "Format version";
    pub const TRANSLATIONS: &str = "Translations";
    pub const ATTACHMENTS: &str = "Attachments";
    pub const SUPERSEDED: &str = "Superseded statement";
    pub const CONTENT: &str = "Statement content";

    /// Labels of the unversioned format.
    pub const LEGACY_DOMAIN: &str = "Domain";
    pub const LEGACY_CONTENT: &str = "Content";
}

/// A header field of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeField {
    Domain,
    Author,
    Representative,
    Time,
    Tags,
    FormatVersion,
    Translations,
    Attachments,
    SupersededStatement,
}

impl EnvelopeField {
    /// The label used by current statements.
    pub fn label(self) -> &'static str {
        match self {
            Self::Domain => labels::DOMAIN,
            Self::Author => labels::AUTHOR,
            Self::Representative => labels::REPRESENTATIVE,
            Self::Time => labels::TIME,
            Self::Tags => labels::TAGS,
            Self::FormatVersion => labels::FORMAT_VERSION,
            Self::Translations => labels::TRANSLATIONS,
            Self::Attachments => labels::ATTACHMENTS,
            Self::SupersededStatement => labels::SUPERSEDED,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::Domain | Self::Author | Self::Time | Self::FormatVersion
        )
    }
}

/// One header line of a grammar.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLine {
    pub field: EnvelopeField,
    pub label: &'static str,
}

impl HeaderLine {
    pub const fn new(field: EnvelopeField, label: &'static str) -> Self {
        Self { field, label }
    }
}

/// Accepted syntax of the `Time` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSyntax {
    /// `Mon, 01 Jan 2024 00:00:00 GMT` only.
    Rfc1123,
    /// Anything [`parse_lenient`] understands.
    Lenient,
}

/// How strictly decoding treats the `Format version` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    /// The line must be present and name this grammar's version.
    Exact,
    /// The line may be missing; its value is reported but not checked.
    Lenient,
}

/// The envelope layout of one format version.
#[derive(Debug)]
pub struct EnvelopeGrammar {
    pub version: &'static str,
    pub header: &'static [HeaderLine],
    pub content_label: &'static str,
    pub time_syntax: TimeSyntax,
}

/// A decoded envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub statement: Statement,
    /// Value of the `Format version` line, if the text has one.
    pub declared_version: Option<String>,
}

impl EnvelopeGrammar {
    /// Whether statements of this version can carry `field`.
    pub fn supports(&self, field: EnvelopeField) -> bool {
        self.header.iter().any(|line| line.field == field)
    }

    fn label_of(&self, field: EnvelopeField) -> &'static str {
        self.header
            .iter()
            .find(|line| line.field == field)
            .map_or(field.label(), |line| line.label)
    }

    /// Encode a statement into canonical text.
    pub fn encode(&self, statement: &Statement) -> Result<String> {
        self.check_supported(statement)?;

        let mut out = String::new();
        for line in self.header {
            match self.header_value(line, statement)? {
                Some(value) => {
                    if value.is_empty() {
                        return Err(CodecError::envelope(line.label, "value is empty"));
                    }
                    if value.contains(['\n', '\r']) {
                        return Err(CodecError::envelope(line.label, "value must be a single line"));
                    }
                    out.push_str(line.label);
                    out.push_str(": ");
                    out.push_str(&value);
                    out.push('\n');
                }
                None if line.field.is_required() => {
                    return Err(CodecError::envelope(line.label, "required field is missing"));
                }
                None => {}
            }
        }

        let content = with_trailing_newline(&statement.content);
        check_body(self.content_label, &content, &statement.translations)?;
        out.push_str(self.content_label);
        out.push_str(": ");
        out.push_str(&content);

        for (lang, text) in &statement.translations {
            let text = with_trailing_newline(text);
            check_body(&format!("Translation {lang}"), &text, &statement.translations)?;
            out.push_str(&translation_prefix(lang));
            out.push_str(&text);
        }

        self.check_length(&out)?;
        Ok(out)
    }

    fn check_supported(&self, statement: &Statement) -> Result<()> {
        let used = [
            (EnvelopeField::Representative, statement.representative.is_some()),
            (EnvelopeField::Tags, !statement.tags.is_empty()),
            (EnvelopeField::Translations, !statement.translations.is_empty()),
            (EnvelopeField::Attachments, !statement.attachments.is_empty()),
            (EnvelopeField::SupersededStatement, statement.superseded_statement.is_some()),
        ];
        match used.into_iter().find(|&(field, used)| used && !self.supports(field)) {
            Some((field, _)) => Err(CodecError::UnsupportedField {
                field: field.label().to_string(),
                version: self.version.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn header_value(&self, line: &HeaderLine, statement: &Statement) -> Result<Option<String>> {
        Ok(match line.field {
            EnvelopeField::Domain => Some(statement.domain.clone()),
            EnvelopeField::Author => Some(statement.author.clone()),
            EnvelopeField::Representative => statement.representative.clone(),
            EnvelopeField::Time => Some(format_rfc1123(&truncate_to_seconds(statement.time))),
            EnvelopeField::Tags => {
                if let Some(tag) = statement.tags.iter().find(|t| t.trim().is_empty() || t.contains(',')) {
                    return Err(CodecError::envelope(
                        line.label,
                        format!("tag '{tag}' is empty or contains a comma"),
                    ));
                }
                (!statement.tags.is_empty()).then(|| statement.tags.join(", "))
            }
            EnvelopeField::FormatVersion => Some(self.version.to_string()),
            EnvelopeField::Translations => {
                if let Some(lang) = statement.translations.keys().find(|l| !is_language_code(l)) {
                    return Err(CodecError::envelope(
                        line.label,
                        format!("'{lang}' is not a two or three letter language code"),
                    ));
                }
                (!statement.translations.is_empty()).then(|| {
                    statement
                        .translations
                        .keys()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
            }
            EnvelopeField::Attachments => {
                for name in &statement.attachments {
                    Attachment::parse(name).map_err(|e| CodecError::envelope(line.label, e.to_string()))?;
                }
                (!statement.attachments.is_empty()).then(|| statement.attachments.join(", "))
            }
            EnvelopeField::SupersededStatement => statement.superseded_statement.clone(),
        })
    }

    /// Decode canonical text written with this grammar.
    ///
    /// Decoding is all-or-nothing: any malformed line fails the whole
    /// statement with the label of the offending field.
    pub fn decode(&self, text: &str, check: VersionCheck) -> Result<Decoded> {
        self.check_length(text)?;
        if text.contains("\n\n") {
            return Err(CodecError::envelope(
                self.content_label,
                "a statement must not contain blank lines",
            ));
        }

        let mut rest = text;
        let mut header: Vec<(EnvelopeField, &str)> = Vec::with_capacity(self.header.len());
        for line in self.header {
            let value = match rest
                .strip_prefix(line.label)
                .and_then(|after| after.strip_prefix(": "))
            {
                Some(after) => {
                    let (value, tail) = after
                        .split_once('\n')
                        .ok_or_else(|| CodecError::envelope(line.label, "header line is not terminated"))?;
                    rest = tail;
                    Some(value)
                }
                None => None,
            };
            let required = line.field.is_required()
                && !(line.field == EnvelopeField::FormatVersion && check == VersionCheck::Lenient);
            match value {
                Some(v) if !v.is_empty() => header.push((line.field, v)),
                _ if required => {
                    return Err(CodecError::envelope(line.label, "required field is missing"));
                }
                _ => {}
            }
        }
        let get = |field: EnvelopeField| header.iter().find(|(f, _)| *f == field).map(|(_, v)| *v);

        let body = rest
            .strip_prefix(self.content_label)
            .and_then(|after| after.strip_prefix(": "))
            .ok_or_else(|| self.unexpected_line(rest))?;

        let declared_version = get(EnvelopeField::FormatVersion).map(str::to_string);
        if let (VersionCheck::Exact, Some(declared)) = (check, declared_version.as_deref()) {
            if declared != self.version {
                return Err(CodecError::envelope(
                    self.label_of(EnvelopeField::FormatVersion),
                    format!("expected {}, found {declared}", self.version),
                ));
            }
        }

        let raw_time = get(EnvelopeField::Time).unwrap_or_default();
        let time = match self.time_syntax {
            TimeSyntax::Rfc1123 => parse_rfc1123(raw_time),
            TimeSyntax::Lenient => parse_lenient(raw_time),
        }
        .ok_or_else(|| {
            CodecError::envelope(
                self.label_of(EnvelopeField::Time),
                format!("expected an RFC 1123 GMT time, got '{raw_time}'"),
            )
        })?;

        let tags = get(EnvelopeField::Tags).map(split_tags).unwrap_or_default();

        let languages = match get(EnvelopeField::Translations) {
            Some(value) => parse_languages(self.label_of(EnvelopeField::Translations), value)?,
            None => Vec::new(),
        };

        let attachments = match get(EnvelopeField::Attachments) {
            Some(value) => value
                .split(", ")
                .map(|name| {
                    Attachment::parse(name)
                        .map(|_| name.to_string())
                        .map_err(|e| CodecError::envelope(self.label_of(EnvelopeField::Attachments), e.to_string()))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let (content, translations) = split_translations(body, &languages)?;
        if content.trim().is_empty() {
            return Err(CodecError::envelope(self.content_label, "required field is missing"));
        }

        let statement = Statement {
            domain: get(EnvelopeField::Domain).unwrap_or_default().to_string(),
            author: get(EnvelopeField::Author).unwrap_or_default().to_string(),
            representative: get(EnvelopeField::Representative).map(str::to_string),
            time,
            tags,
            content: content.to_string(),
            superseded_statement: get(EnvelopeField::SupersededStatement).map(str::to_string),
            translations,
            attachments,
        };
        Ok(Decoded {
            statement,
            declared_version,
        })
    }

    /// Error for the line found where the content label was expected.
    fn unexpected_line(&self, rest: &str) -> CodecError {
        let line = rest.split('\n').next().unwrap_or_default();
        if line.is_empty() {
            return CodecError::envelope(self.content_label, "required field is missing");
        }
        match self
            .header
            .iter()
            .find(|h| line.strip_prefix(h.label).is_some_and(|after| after.starts_with(": ")))
        {
            Some(h) => CodecError::envelope(h.label, "field is duplicated or out of order"),
            None => {
                let shown: String = line.chars().take(40).collect();
                CodecError::envelope(
                    self.content_label,
                    format!("expected '{}: ', found '{shown}'", self.content_label),
                )
            }
        }
    }

    fn check_length(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len > MAX_STATEMENT_LENGTH {
            return Err(CodecError::envelope(
                self.content_label,
                format!("statement is {len} characters long, the limit is {MAX_STATEMENT_LENGTH}"),
            ));
        }
        Ok(())
    }
}

/// Content and translation text must not break statement framing.
fn check_body(label: &str, body: &str, translations: &BTreeMap<String, String>) -> Result<()> {
    if body.trim().is_empty() {
        return Err(CodecError::envelope(label, "required field is missing"));
    }
    if body.contains("\n\n") {
        return Err(CodecError::envelope(label, "must not contain blank lines"));
    }
    if body.contains(&format!("\n{}: ", labels::DOMAIN)) {
        return Err(CodecError::envelope(
            label,
            format!("must not contain a '{}: ' line", labels::DOMAIN),
        ));
    }
    if body.contains(&format!("\n{}", signature_marker())) {
        return Err(CodecError::envelope(label, "must not contain a signature block"));
    }
    if let Some(lang) = body
        .split('\n')
        .filter_map(translation_marker)
        .find(|lang| translations.contains_key(*lang))
    {
        return Err(CodecError::envelope(
            label,
            format!("must not contain a 'Translation {lang}: ' line"),
        ));
    }
    Ok(())
}

/// Split a tag list, trimming whitespace and dropping empty entries.
fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_languages(label: &str, value: &str) -> Result<Vec<String>> {
    let mut languages: Vec<String> = Vec::new();
    for lang in value.split(", ") {
        if !is_language_code(lang) {
            return Err(CodecError::envelope(
                label,
                format!("'{lang}' is not a two or three letter language code"),
            ));
        }
        if languages.iter().any(|l| l == lang) {
            return Err(CodecError::envelope(label, format!("language '{lang}' is declared twice")));
        }
        languages.push(lang.to_string());
    }
    Ok(languages)
}

/// Split the body after the content label into content and translations.
fn split_translations<'a>(
    body: &'a str,
    languages: &[String],
) -> Result<(&'a str, BTreeMap<String, String>)> {
    let mut rest = body;
    let mut segments = Vec::with_capacity(languages.len() + 1);
    for lang in languages {
        let marker = format!("\n{}", translation_prefix(lang));
        let idx = rest.find(&marker).ok_or_else(|| {
            CodecError::envelope(format!("Translation {lang}"), "translation block is missing")
        })?;
        // The newline closing the previous block belongs to that block.
        segments.push(&rest[..=idx]);
        rest = &rest[idx + marker.len()..];
    }
    segments.push(rest);

    let content = segments[0];
    let mut translations = BTreeMap::new();
    for (lang, text) in languages.iter().zip(&segments[1..]) {
        if text.trim().is_empty() {
            return Err(CodecError::envelope(format!("Translation {lang}"), "translation is empty"));
        }
        translations.insert(lang.clone(), text.trim_end_matches('\n').to_string());
    }
    Ok((content, translations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{V1, V3, V5};
    use chrono::{TimeZone, Utc};

    fn statement(content: &str) -> Statement {
        Statement {
            domain: "example.com".into(),
            author: "Example".into(),
            representative: None,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            tags: Vec::new(),
            content: content.into(),
            superseded_statement: None,
            translations: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_encode_minimal() {
        let text = V5.encode(&statement("hello world")).unwrap();
        assert_eq!(
            text,
            "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
             Format version: 5\nStatement content: hello world\n"
        );
    }

    #[test]
    fn test_encode_translations_after_content() {
        let mut s = statement("Hello\n");
        s.translations.insert("fr".into(), "Bonjour".into());
        s.translations.insert("de".into(), "Hallo\n".into());
        let text = V5.encode(&s).unwrap();
        assert!(text.contains("Format version: 5\nTranslations: de, fr\nStatement content: Hello\n"));
        assert!(text.ends_with("Hello\nTranslation de: Hallo\nTranslation fr: Bonjour\n"));

        let decoded = V5.decode(&text, VersionCheck::Exact).unwrap();
        assert_eq!(decoded.statement.content, "Hello\n");
        assert_eq!(decoded.statement.translations["de"], "Hallo");
        assert_eq!(decoded.statement.translations["fr"], "Bonjour");
    }

    #[test]
    fn test_translations_come_back_as_supplied() {
        let mut s = statement("Hello\n");
        s.translations.insert("de".into(), "Hallo".into());
        s.translations.insert("fr".into(), "Bonjour:\nà bientôt ---".into());
        let text = V5.encode(&s).unwrap();
        let decoded = V5.decode(&text, VersionCheck::Exact).unwrap();
        assert_eq!(decoded.statement, s);
    }

    #[test]
    fn test_decode_declared_translation_order() {
        let text = "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                    Format version: 5\nTranslations: fr, de\nStatement content: Hello\n\
                    Translation fr: Bonjour\nTranslation de: Hallo\n";
        let decoded = V5.decode(text, VersionCheck::Exact).unwrap();
        assert_eq!(decoded.statement.translations.len(), 2);
        assert_eq!(decoded.statement.translations["fr"], "Bonjour");

        let swapped = text.replace("Translations: fr, de", "Translations: de, fr");
        let err = V5.decode(&swapped, VersionCheck::Exact).unwrap_err();
        assert_eq!(err.field(), Some("Translation fr"));
    }

    #[test]
    fn test_content_guards() {
        let err = V5
            .encode(&statement("a\nPublishing domain: evil.example\n"))
            .unwrap_err();
        assert_eq!(err.field(), Some(labels::CONTENT));

        let err = V5.encode(&statement("a\n\nb")).unwrap_err();
        assert_eq!(err.field(), Some(labels::CONTENT));

        let mut s = statement("Hello\nTranslation de: sneaky\n");
        s.translations.insert("de".into(), "Hallo".into());
        assert_eq!(V5.encode(&s).unwrap_err().field(), Some(labels::CONTENT));

        // Without a declared German translation the line is ordinary text.
        assert!(V5.encode(&statement("Hello\nTranslation de: fine\n")).is_ok());
    }

    #[test]
    fn test_content_must_not_open_a_signature_block() {
        let err = V5
            .encode(&statement("Minutes\n---\nStatement hash: agenda item 3\n"))
            .unwrap_err();
        assert_eq!(err.field(), Some(labels::CONTENT));

        let mut s = statement("Minutes");
        s.translations.insert("de".into(), "Protokoll\n---\nStatement hash: Punkt 3".into());
        assert_eq!(V5.encode(&s).unwrap_err().field(), Some("Translation de"));

        // A rule line alone, or a hash label not at a line start, is ordinary text.
        assert!(V5.encode(&statement("Minutes\n---\nagenda item 3\n")).is_ok());
        assert!(V5.encode(&statement("---\nnote: Statement hash: x\n")).is_ok());
    }

    #[test]
    fn test_header_values_single_line() {
        let mut s = statement("x");
        s.author = "two\nlines".into();
        assert_eq!(V5.encode(&s).unwrap_err().field(), Some(labels::AUTHOR));

        let mut s = statement("x");
        s.representative = Some(String::new());
        assert_eq!(V5.encode(&s).unwrap_err().field(), Some(labels::REPRESENTATIVE));
    }

    #[test]
    fn test_unsupported_field() {
        let mut s = statement("x");
        s.attachments.push(Attachment::for_bytes(b"a", "txt").unwrap().to_string());
        let err = V3.encode(&s).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedField {
                field: labels::ATTACHMENTS.into(),
                version: "3".into()
            }
        );
    }

    #[test]
    fn test_decode_missing_and_misplaced() {
        let text = "Publishing domain: example.com\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                    Format version: 5\nStatement content: x\n";
        assert_eq!(
            V5.decode(text, VersionCheck::Exact).unwrap_err().field(),
            Some(labels::AUTHOR)
        );

        let text = "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                    Format version: 5\nAuthor: Again\nStatement content: x\n";
        assert_eq!(
            V5.decode(text, VersionCheck::Exact).unwrap_err().field(),
            Some(labels::AUTHOR)
        );
    }

    #[test]
    fn test_decode_bad_time() {
        let text = "Publishing domain: example.com\nAuthor: Example\nTime: 2024-01-01T00:00:00Z\n\
                    Format version: 5\nStatement content: x\n";
        assert_eq!(
            V5.decode(text, VersionCheck::Exact).unwrap_err().field(),
            Some(labels::TIME)
        );
    }

    #[test]
    fn test_decode_tags_are_trimmed() {
        let text = "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                    Tags: a,  b , ,c\nFormat version: 5\nStatement content: x\n";
        let decoded = V5.decode(text, VersionCheck::Exact).unwrap();
        assert_eq!(decoded.statement.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_length_limit() {
        let long = "x".repeat(MAX_STATEMENT_LENGTH);
        let err = V5.encode(&statement(&long)).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_legacy_labels() {
        let text = "Domain: example.com\nAuthor: Example\nTime: Thu, 04 Mar 2021 11:00:00 +0100\nContent: hello";
        let decoded = V1.decode(text, VersionCheck::Lenient).unwrap();
        assert_eq!(decoded.statement.content, "hello");
        assert_eq!(decoded.declared_version, None);
        assert_eq!(
            decoded.statement.time,
            Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap()
        );
    }
}
