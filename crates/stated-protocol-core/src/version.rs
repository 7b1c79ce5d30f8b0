//! Format versions and migration between them.
//!
//! Every version that was ever published stays registered: peers on the
//! network run different versions at the same time and statements must keep
//! parsing forever. Versions are linearly ordered and migration only moves
//! forward, one version per step.

use crate::canonical::{labels, Decoded, EnvelopeField as F, EnvelopeGrammar, HeaderLine, TimeSyntax, VersionCheck};
use crate::error::{CodecError, Result};
use crate::statement::{statement_hash, ParseOptions};

/// Version written by [`crate::build_statement`].
pub const CURRENT_FORMAT_VERSION: &str = "5";

/// Unversioned statements: `Domain:` / `Content:` and free-form times.
pub static V1: EnvelopeGrammar = EnvelopeGrammar {
    version: "1",
    header: &[
        HeaderLine::new(F::Domain, labels::LEGACY_DOMAIN),
        HeaderLine::new(F::Author, labels::AUTHOR),
        HeaderLine::new(F::Time, labels::TIME),
        HeaderLine::new(F::Tags, labels::TAGS),
    ],
    content_label: labels::LEGACY_CONTENT,
    time_syntax: TimeSyntax::Lenient,
};

pub static V2: EnvelopeGrammar = EnvelopeGrammar {
    version: "2",
    header: &[
        HeaderLine::new(F::Domain, labels::DOMAIN),
        HeaderLine::new(F::Author, labels::AUTHOR),
        HeaderLine::new(F::Time, labels::TIME),
        HeaderLine::new(F::Tags, labels::TAGS),
        HeaderLine::new(F::SupersededStatement, labels::SUPERSEDED),
        HeaderLine::new(F::FormatVersion, labels::FORMAT_VERSION),
    ],
    content_label: labels::CONTENT,
    time_syntax: TimeSyntax::Rfc1123,
};

/// Adds the signing representative.
pub static V3: EnvelopeGrammar = EnvelopeGrammar {
    version: "3",
    header: &[
        HeaderLine::new(F::Domain, labels::DOMAIN),
        HeaderLine::new(F::Author, labels::AUTHOR),
        HeaderLine::new(F::Representative, labels::REPRESENTATIVE),
        HeaderLine::new(F::Time, labels::TIME),
        HeaderLine::new(F::Tags, labels::TAGS),
        HeaderLine::new(F::SupersededStatement, labels::SUPERSEDED),
        HeaderLine::new(F::FormatVersion, labels::FORMAT_VERSION),
    ],
    content_label: labels::CONTENT,
    time_syntax: TimeSyntax::Rfc1123,
};

/// Adds translations.
pub static V4: EnvelopeGrammar = EnvelopeGrammar {
    version: "4",
    header: &[
        HeaderLine::new(F::Domain, labels::DOMAIN),
        HeaderLine::new(F::Author, labels::AUTHOR),
        HeaderLine::new(F::Representative, labels::REPRESENTATIVE),
        HeaderLine::new(F::Time, labels::TIME),
        HeaderLine::new(F::Tags, labels::TAGS),
        HeaderLine::new(F::SupersededStatement, labels::SUPERSEDED),
        HeaderLine::new(F::FormatVersion, labels::FORMAT_VERSION),
        HeaderLine::new(F::Translations, labels::TRANSLATIONS),
    ],
    content_label: labels::CONTENT,
    time_syntax: TimeSyntax::Rfc1123,
};

/// Adds attachments and moves the superseded reference to the end.
pub static V5: EnvelopeGrammar = EnvelopeGrammar {
    version: "5",
    header: &[
        HeaderLine::new(F::Domain, labels::DOMAIN),
        HeaderLine::new(F::Author, labels::AUTHOR),
        HeaderLine::new(F::Representative, labels::REPRESENTATIVE),
        HeaderLine::new(F::Time, labels::TIME),
        HeaderLine::new(F::Tags, labels::TAGS),
        HeaderLine::new(F::FormatVersion, labels::FORMAT_VERSION),
        HeaderLine::new(F::Translations, labels::TRANSLATIONS),
        HeaderLine::new(F::Attachments, labels::ATTACHMENTS),
        HeaderLine::new(F::SupersededStatement, labels::SUPERSEDED),
    ],
    content_label: labels::CONTENT,
    time_syntax: TimeSyntax::Rfc1123,
};

/// All registered grammars, oldest first.
pub static GRAMMARS: [&EnvelopeGrammar; 5] = [&V1, &V2, &V3, &V4, &V5];

/// The grammar registered for `version`.
pub fn grammar_for(version: &str) -> Option<&'static EnvelopeGrammar> {
    GRAMMARS.iter().copied().find(|g| g.version == version)
}

/// The grammar new statements are written with.
pub fn current() -> &'static EnvelopeGrammar {
    &V5
}

fn next(grammar: &EnvelopeGrammar) -> Option<&'static EnvelopeGrammar> {
    let idx = GRAMMARS.iter().position(|g| g.version == grammar.version)?;
    GRAMMARS.get(idx + 1).copied()
}

/// Value of the `Format version` line, looking only at the header.
pub fn declared_version(text: &str) -> Option<&str> {
    let prefix = format!("{}: ", labels::FORMAT_VERSION);
    text.split('\n')
        .take_while(|line| !is_content_line(line))
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}

fn is_content_line(line: &str) -> bool {
    [labels::CONTENT, labels::LEGACY_CONTENT]
        .iter()
        .any(|label| line.strip_prefix(label).is_some_and(|rest| rest.starts_with(": ")))
}

fn is_legacy(text: &str) -> bool {
    text.starts_with(labels::LEGACY_DOMAIN) && text[labels::LEGACY_DOMAIN.len()..].starts_with(": ")
}

/// Decode `text` with the grammar its `Format version` line selects.
///
/// A registered version is decoded exactly. A missing or unregistered
/// version is rejected unless `allow_no_version` is set. In that case
/// `Domain:` text is read with the oldest grammar and anything else with
/// the newest grammar that accepts it.
pub fn decode(text: &str, options: ParseOptions) -> Result<(&'static EnvelopeGrammar, Decoded)> {
    let declared = declared_version(text);
    if let Some(grammar) = declared.and_then(grammar_for) {
        return grammar.decode(text, VersionCheck::Exact).map(|decoded| (grammar, decoded));
    }
    if !options.allow_no_version {
        return Err(match declared {
            Some(version) => CodecError::UnsupportedVersion(version.to_string()),
            None => CodecError::envelope(labels::FORMAT_VERSION, "required field is missing"),
        });
    }
    if is_legacy(text) {
        return V1.decode(text, VersionCheck::Lenient).map(|decoded| (&V1, decoded));
    }

    let mut newest_error = None;
    for grammar in GRAMMARS[1..].iter().rev().copied() {
        match grammar.decode(text, VersionCheck::Lenient) {
            Ok(decoded) => return Ok((grammar, decoded)),
            Err(e) => {
                newest_error.get_or_insert(e);
            }
        }
    }
    Err(newest_error.unwrap_or_else(|| CodecError::envelope(labels::CONTENT, "required field is missing")))
}

/// Re-emit an unversioned legacy statement in format version 2.
///
/// Tags become a list, the time is normalized to RFC 1123 and the given
/// hash is recorded as the superseded statement. The result is a new
/// statement with a new hash; callers keep track of the mapping.
pub fn migrate_v1_to_v2(text: &str, superseded_statement: &str) -> Result<String> {
    let mut statement = V1.decode(text, VersionCheck::Lenient)?.statement;
    statement.superseded_statement = Some(superseded_statement.to_string());
    V2.encode(&statement)
}

/// Re-emit `text` in the next format version.
///
/// Legacy statements are migrated to version 2 superseding their own hash;
/// other unversioned text gains the `Format version` line of the newest
/// grammar that reads it. Returns `None` for statements already in the
/// current version.
pub fn upgrade(text: &str) -> Result<Option<String>> {
    let Some(version) = declared_version(text) else {
        if is_legacy(text) {
            return migrate_v1_to_v2(text, &statement_hash(text)).map(Some);
        }
        let (grammar, decoded) = decode(text, ParseOptions::allow_no_version())?;
        return grammar.encode(&decoded.statement).map(Some);
    };
    let grammar = grammar_for(version).ok_or_else(|| CodecError::UnsupportedVersion(version.to_string()))?;
    let Some(target) = next(grammar) else {
        return Ok(None);
    };
    let decoded = grammar.decode(text, VersionCheck::Exact)?;
    target.encode(&decoded.statement).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{parse_statement, Statement};
    use chrono::{TimeZone, Utc};

    const LEGACY: &str = "Domain: example.com\nAuthor: Example\nTime: Thu, 04 Mar 2021 11:00:00 +0100\n\
                          Tags: climate,energy\nContent: hello\n";

    fn v3_text() -> String {
        let statement = Statement::builder("example.com", "Example", Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap())
            .representative("Jane Doe")
            .tag("climate")
            .content("hello")
            .statement();
        V3.encode(&statement).unwrap()
    }

    #[test]
    fn test_registry() {
        assert_eq!(current().version, CURRENT_FORMAT_VERSION);
        for (i, grammar) in GRAMMARS.iter().enumerate() {
            assert_eq!(grammar.version, (i + 1).to_string());
            assert_eq!(grammar_for(grammar.version).map(|g| g.version), Some(grammar.version));
        }
        assert!(grammar_for("5.1").is_none());
    }

    #[test]
    fn test_declared_version_ignores_content() {
        let text = "Publishing domain: a\nAuthor: b\nTime: t\nStatement content: x\nFormat version: 3\n";
        assert_eq!(declared_version(text), None);
        assert_eq!(declared_version(&v3_text()), Some("3"));
    }

    #[test]
    fn test_migrate_v1_to_v2() {
        let old_hash = statement_hash(LEGACY);
        let migrated = migrate_v1_to_v2(LEGACY, &old_hash).unwrap();
        assert_eq!(
            migrated,
            format!(
                "Publishing domain: example.com\nAuthor: Example\nTime: Thu, 04 Mar 2021 10:00:00 GMT\n\
                 Tags: climate, energy\nSuperseded statement: {old_hash}\nFormat version: 2\n\
                 Statement content: hello\n"
            )
        );
        assert_ne!(statement_hash(&migrated), old_hash);

        let parsed = parse_statement(&migrated, ParseOptions::default()).unwrap();
        assert_eq!(parsed.statement.superseded_statement.as_deref(), Some(old_hash.as_str()));
        assert_eq!(parsed.statement.tags, vec!["climate", "energy"]);
    }

    #[test]
    fn test_older_versions_still_parse() {
        let parsed = parse_statement(&v3_text(), ParseOptions::default()).unwrap();
        assert_eq!(parsed.format_version, "3");
        assert_eq!(parsed.statement.representative.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_upgrade_steps_forward() {
        let v4 = upgrade(&v3_text()).unwrap().unwrap();
        assert_eq!(declared_version(&v4), Some("4"));
        let v5 = upgrade(&v4).unwrap().unwrap();
        assert_eq!(declared_version(&v5), Some("5"));
        assert_eq!(upgrade(&v5).unwrap(), None);

        let original = parse_statement(&v3_text(), ParseOptions::default()).unwrap();
        let upgraded = parse_statement(&v5, ParseOptions::default()).unwrap();
        assert_eq!(original.statement, upgraded.statement);
    }

    #[test]
    fn test_upgrade_legacy_supersedes_itself() {
        let v2 = upgrade(LEGACY).unwrap().unwrap();
        let parsed = parse_statement(&v2, ParseOptions::default()).unwrap();
        assert_eq!(parsed.format_version, "2");
        assert_eq!(
            parsed.statement.superseded_statement,
            Some(statement_hash(LEGACY))
        );
    }

    #[test]
    fn test_unregistered_version_falls_back_when_allowed() {
        let text = "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                    Format version: 9\nStatement content: hi\n";
        assert_eq!(
            decode(text, ParseOptions::default()).unwrap_err(),
            CodecError::UnsupportedVersion("9".into())
        );

        let (grammar, decoded) = decode(text, ParseOptions::allow_no_version()).unwrap();
        assert_eq!(grammar.version, CURRENT_FORMAT_VERSION);
        assert_eq!(decoded.declared_version.as_deref(), Some("9"));
        assert_eq!(decoded.statement.content, "hi\n");
    }

    #[test]
    fn test_unversioned_text_tries_newest_grammar_first() {
        let name = crate::types::Attachment::for_bytes(b"%PDF", "pdf").unwrap().to_string();
        let text = format!(
            "Publishing domain: example.com\nAuthor: Example\nAuthorized signing representative: Jane Doe\n\
             Time: Mon, 01 Jan 2024 00:00:00 GMT\nAttachments: {name}\nStatement content: hi\n"
        );
        let (grammar, decoded) = decode(&text, ParseOptions::allow_no_version()).unwrap();
        assert_eq!(grammar.version, "5");
        assert_eq!(decoded.declared_version, None);
        assert_eq!(decoded.statement.attachments, vec![name]);
        assert_eq!(decoded.statement.representative.as_deref(), Some("Jane Doe"));

        // Superseded before translations is the version 4 layout.
        let older = "Publishing domain: example.com\nAuthor: Example\nTime: Mon, 01 Jan 2024 00:00:00 GMT\n\
                     Superseded statement: abc\nTranslations: de\nStatement content: hi\nTranslation de: hallo\n";
        let (grammar, decoded) = decode(older, ParseOptions::allow_no_version()).unwrap();
        assert_eq!(grammar.version, "4");
        assert_eq!(decoded.statement.superseded_statement.as_deref(), Some("abc"));
        assert_eq!(decoded.statement.translations["de"], "hallo");

        let upgraded = upgrade(&text).unwrap().unwrap();
        assert_eq!(declared_version(&upgraded), Some("5"));
    }

    #[test]
    fn test_v2_rejects_representative() {
        let statement = Statement::builder("example.com", "Example", Utc::now())
            .representative("Jane")
            .content("x")
            .statement();
        assert!(matches!(
            V2.encode(&statement),
            Err(CodecError::UnsupportedField { .. })
        ));
    }
}
