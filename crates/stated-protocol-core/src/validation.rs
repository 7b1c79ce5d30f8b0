//! Whole-statement validation: signature, envelope, content and references.

use crate::content::{StatementContent, TypedContent};
use crate::error::ValidationError;
use crate::hash::Sha256Hash;
use crate::signed::split_signature;
use crate::statement::{parse_statement, ParseOptions, ParsedStatement};
use crate::text::with_trailing_newline;
use crate::types::Attachment;

/// A statement that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStatement {
    pub parsed: ParsedStatement,
    /// The decoded content block.
    pub content: StatementContent,
    /// Decoded translations, keyed by language.
    pub translations: Vec<(String, StatementContent)>,
}

impl ValidatedStatement {
    /// Hash of the unsigned statement text.
    pub fn hash(&self) -> &str {
        &self.parsed.hash
    }

    /// Check fetched attachment bytes against the name they were listed under.
    pub fn check_attachment(&self, name: &str, bytes: &[u8]) -> Result<(), ValidationError> {
        if !self.parsed.statement.attachments.iter().any(|a| a == name) {
            return Err(ValidationError::InvalidAttachment(name.to_string()));
        }
        let attachment =
            Attachment::parse(name).map_err(|_| ValidationError::InvalidAttachment(name.to_string()))?;
        if !attachment.verify(bytes) {
            return Err(ValidationError::AttachmentMismatch {
                name: name.to_string(),
                computed: Sha256Hash::digest(bytes).to_url_safe(),
            });
        }
        Ok(())
    }
}

/// Validate statement text, verifying its signature block if present.
///
/// This performs:
/// - Signature split, hash and signature verification
/// - Envelope parsing with the declared format version
/// - Typed content and translation decoding
/// - Attachment and superseded reference checks
pub fn validate_statement(text: &str, options: ParseOptions) -> Result<ValidatedStatement, ValidationError> {
    let parsed = parse_statement(text, options)?;
    check_parsed(parsed)
}

/// Validate statement structure without cryptographic verification.
///
/// A signature block is split off and reported but not checked. Useful for
/// text from trusted storage or before verification is affordable.
pub fn validate_statement_structure(
    text: &str,
    options: ParseOptions,
) -> Result<ValidatedStatement, ValidationError> {
    let (unsigned, block) = match split_signature(text)? {
        Some((unsigned, block)) => (unsigned, Some(block)),
        None => (text, None),
    };
    let mut parsed = parse_statement(unsigned, options)?;
    parsed.signature = block;
    check_parsed(parsed)
}

fn check_parsed(parsed: ParsedStatement) -> Result<ValidatedStatement, ValidationError> {
    let statement = &parsed.statement;

    // 1. Content block
    let content = StatementContent::parse(&statement.content)?;

    // 2. Translations share the content's shape; the block's closing newline was framing
    let mut translations = Vec::with_capacity(statement.translations.len());
    for (lang, text) in &statement.translations {
        translations.push((lang.clone(), StatementContent::parse(&with_trailing_newline(text))?));
    }

    // 3. Attachment names
    for name in &statement.attachments {
        Attachment::parse(name).map_err(|_| ValidationError::InvalidAttachment(name.clone()))?;
    }

    // 4. Superseded reference must be a statement hash
    if let Some(superseded) = &statement.superseded_statement {
        Sha256Hash::parse(superseded)
            .map_err(|_| ValidationError::InvalidSupersededReference(superseded.clone()))?;
    }

    // 5. A PDF signature must name its document
    if let StatementContent::Typed(TypedContent::SignPdf(signing)) = &content {
        if signing.document_hash(&statement.attachments).is_none() {
            return Err(ValidationError::MissingDocument);
        }
    }

    Ok(ValidatedStatement {
        parsed,
        content,
        translations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentCodec, PdfSigning};
    use crate::crypto::Keypair;
    use crate::error::CodecError;
    use crate::hash::sha256;
    use crate::statement::Statement;
    use chrono::{TimeZone, Utc};

    fn builder() -> crate::statement::StatementBuilder {
        Statement::builder("example.com", "Example", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn make_test_keypair() -> Keypair {
        Keypair::from_seed(&[0x42; 32])
    }

    #[test]
    fn test_valid_signed_statement() {
        let text = builder().content("hello").build().unwrap();
        let signed = make_test_keypair().sign_statement(&text).unwrap();

        let validated = validate_statement(&signed, ParseOptions::default()).unwrap();
        assert_eq!(validated.hash(), sha256(&text));
        assert_eq!(validated.content, StatementContent::Plain("hello\n".into()));
        assert!(validated.parsed.signature.is_some());
    }

    #[test]
    fn test_invalid_signature() {
        let text = builder().content("hello").build().unwrap();
        let signed = make_test_keypair().sign_statement(&text).unwrap();
        let tampered = signed.replace("Statement content: hello", "Statement content: bye");

        let result = validate_statement(&tampered, ParseOptions::default());
        assert!(matches!(
            result,
            Err(ValidationError::Codec(CodecError::HashMismatch { .. }))
        ));

        // Structure alone is still fine.
        let structural = validate_statement_structure(&tampered, ParseOptions::default()).unwrap();
        assert!(structural.parsed.signature.is_some());
    }

    #[test]
    fn test_typed_translation_decoded() {
        let vote = crate::content::Vote {
            poll_hash: sha256("poll"),
            poll: "Q?".into(),
            vote: "Yes".into(),
        };
        let vote_de = crate::content::Vote {
            poll: "F?".into(),
            vote: "Ja".into(),
            ..vote.clone()
        };
        let text = builder()
            .content(vote.build_content().unwrap())
            .translation("de", vote_de.build_content().unwrap())
            .build()
            .unwrap();
        let validated = validate_statement(&text, ParseOptions::default()).unwrap();
        assert!(!validated.parsed.statement.translations["de"].ends_with('\n'));
        assert_eq!(
            validated.translations,
            vec![("de".to_string(), StatementContent::Typed(TypedContent::Vote(vote_de)))]
        );
    }

    #[test]
    fn test_bad_superseded_reference() {
        let text = builder()
            .content("hello")
            .superseded_statement("not a hash")
            .build()
            .unwrap();
        assert!(matches!(
            validate_statement(&text, ParseOptions::default()),
            Err(ValidationError::InvalidSupersededReference(_))
        ));
    }

    #[test]
    fn test_pdf_signing_needs_document() {
        let content = PdfSigning::default().build_content().unwrap();
        let text = builder().content(content.clone()).build().unwrap();
        assert!(matches!(
            validate_statement(&text, ParseOptions::default()),
            Err(ValidationError::MissingDocument)
        ));

        let pdf = b"%PDF-1.7 contract";
        let name = Attachment::for_bytes(pdf, "pdf").unwrap().to_string();
        let text = builder().content(content).attachment(name.clone()).build().unwrap();
        let validated = validate_statement(&text, ParseOptions::default()).unwrap();
        assert!(validated.check_attachment(&name, pdf).is_ok());
        assert!(matches!(
            validated.check_attachment(&name, b"other bytes"),
            Err(ValidationError::AttachmentMismatch { .. })
        ));
        assert!(matches!(
            validated.check_attachment("unlisted.pdf", pdf),
            Err(ValidationError::InvalidAttachment(_))
        ));
    }
}
