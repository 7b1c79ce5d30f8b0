//! The Codec: configured publishing and ingestion of statements.
//!
//! The core crate offers pure functions. The codec bundles them the way a
//! host (API server, P2P node, viewer) uses them: publish with an optional
//! signing key, ingest single statements or whole statements files, and
//! migrate legacy statements while keeping track of their hashes.

use std::collections::HashSet;

use serde::Deserialize;
use stated_protocol_core::{
    build_statement, migrate_v1_to_v2, parse_statement, split_statements, statement_hash,
    validate_statement, validate_statement_structure, Keypair, ParseOptions, ParsedStatement,
    PublicKey, Statement, StatementContent,
};
use tracing::{debug, info, warn};

use crate::error::{ProtocolError, Result};

/// Configuration for the Codec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Accept statements without a `Format version` line.
    pub allow_no_version: bool,
    /// Reject statements without a signature block.
    pub require_signature: bool,
    /// Decode and validate typed content on ingest.
    pub parse_typed_content: bool,
    /// Check the hash and signature of signed text. Turn off only for
    /// text read back from trusted storage.
    pub verify_signatures: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            allow_no_version: false,
            require_signature: false,
            parse_typed_content: true,
            verify_signatures: true,
        }
    }
}

/// A statement ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Hash of the unsigned text.
    pub hash: String,
    /// Canonical text, with a signature block if the codec has a key.
    pub text: String,
}

/// A statement accepted by [`Codec::ingest`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub parsed: ParsedStatement,
    /// Decoded content, when the codec decodes typed content.
    pub content: Option<StatementContent>,
}

impl Ingested {
    pub fn hash(&self) -> &str {
        &self.parsed.hash
    }
}

/// Outcome of ingesting a statements file.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Accepted statements, in file order.
    pub accepted: Vec<Ingested>,
    /// Entries repeating an already accepted statement.
    pub duplicate_count: usize,
    /// Index within the file and the reason for each rejected entry.
    pub rejected: Vec<(usize, ProtocolError)>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// A legacy statement re-emitted in a versioned format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub old_hash: String,
    pub new_hash: String,
    pub text: String,
}

/// Publishes and ingests statements under one configuration.
#[derive(Debug, Clone)]
pub struct Codec {
    /// Signing key for published statements.
    keypair: Option<Keypair>,
    config: CodecConfig,
}

impl Codec {
    /// A codec that publishes unsigned statements.
    pub fn new(config: CodecConfig) -> Self {
        Self {
            keypair: None,
            config,
        }
    }

    /// A codec that signs everything it publishes.
    pub fn with_keypair(keypair: Keypair, config: CodecConfig) -> Self {
        Self {
            keypair: Some(keypair),
            config,
        }
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.keypair.as_ref().map(Keypair::public_key)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            allow_no_version: self.config.allow_no_version,
        }
    }

    fn finish(&self, text: String) -> Result<String> {
        match &self.keypair {
            Some(keypair) => Ok(keypair.sign_statement(&text)?),
            None => Ok(text),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publishing
    // ─────────────────────────────────────────────────────────────────────────

    /// Encode a statement, signing it when the codec has a key.
    pub fn publish(&self, statement: &Statement) -> Result<Published> {
        let text = build_statement(statement)?;
        let hash = statement_hash(&text);
        let text = self.finish(text)?;
        debug!(%hash, domain = %statement.domain, signed = self.keypair.is_some(), "published statement");
        Ok(Published { hash, text })
    }

    /// Re-emit a legacy statement in format version 2.
    ///
    /// The new statement supersedes `superseded_statement`, or the legacy
    /// statement itself when none is given.
    pub fn migrate_legacy(&self, text: &str, superseded_statement: Option<&str>) -> Result<Migration> {
        let old_hash = statement_hash(text);
        let superseded = superseded_statement.unwrap_or(&old_hash);
        let migrated = migrate_v1_to_v2(text, superseded)?;
        let new_hash = statement_hash(&migrated);
        let text = self.finish(migrated)?;
        info!(%old_hash, %new_hash, "migrated legacy statement");
        Ok(Migration {
            old_hash,
            new_hash,
            text,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingestion
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify, parse and classify one statement.
    pub fn ingest(&self, text: &str) -> Result<Ingested> {
        match self.ingest_inner(text) {
            Ok(ingested) => {
                debug!(
                    hash = %ingested.hash(),
                    statement_type = %ingested.parsed.type_slug(),
                    signed = ingested.parsed.signature.is_some(),
                    "ingested statement"
                );
                Ok(ingested)
            }
            Err(e) => {
                warn!("Rejected statement: {}", e);
                Err(e)
            }
        }
    }

    fn ingest_inner(&self, text: &str) -> Result<Ingested> {
        let options = self.parse_options();
        let (parsed, content) = match (self.config.verify_signatures, self.config.parse_typed_content) {
            (true, true) => {
                let validated = validate_statement(text, options)?;
                (validated.parsed, Some(validated.content))
            }
            (true, false) => (parse_statement(text, options)?, None),
            (false, typed) => {
                let validated = validate_statement_structure(text, options)?;
                (validated.parsed, typed.then_some(validated.content))
            }
        };
        if self.config.require_signature && parsed.signature.is_none() {
            return Err(ProtocolError::SignatureRequired);
        }
        Ok(Ingested { parsed, content })
    }

    /// Ingest every statement of a statements file.
    ///
    /// One bad entry does not reject the file; it is reported with its
    /// index and the remaining entries are still ingested.
    pub fn ingest_file(&self, file: &str) -> IngestReport {
        let mut report = IngestReport::default();
        let mut seen = HashSet::new();
        for (index, entry) in split_statements(file).iter().enumerate() {
            match self.ingest(entry) {
                Ok(ingested) => {
                    if seen.insert(ingested.hash().to_string()) {
                        report.accepted.push(ingested);
                    } else {
                        report.duplicate_count += 1;
                    }
                }
                Err(e) => report.rejected.push((index, e)),
            }
        }
        info!(
            accepted = report.accepted.len(),
            duplicates = report.duplicate_count,
            rejected = report.rejected.len(),
            "ingested statements file"
        );
        report
    }
}
