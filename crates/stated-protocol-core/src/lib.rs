//! # Stated Protocol Core
//!
//! Pure codec for statements: the canonical text envelope, typed content
//! blocks, content hashes, Ed25519 signatures and format-version migration.
//!
//! This crate contains no I/O, no storage, no networking and no global
//! mutable state. Every function is a deterministic function of its inputs.
//!
//! ## Key Types
//!
//! - [`Statement`] - The envelope fields of a statement
//! - [`StatementContent`] - Plain text or one of the typed content blocks
//! - [`ParsedStatement`] - Result of [`parse_statement`]
//! - [`SignedStatement`] - Statement text plus its signature block
//! - [`EnvelopeGrammar`] - The layout of one format version
//!
//! ## Canonical text
//!
//! ```text
//! Publishing domain: example.com
//! Author: Example
//! Time: Mon, 01 Jan 2024 00:00:00 GMT
//! Format version: 5
//! Statement content: We support the treaty.
//! ```
//!
//! See [`canonical`] for the encoding rules and [`version`] for the
//! registered format versions.

pub mod canonical;
pub mod constants;
pub mod content;
pub mod crypto;
pub mod datetime;
pub mod error;
pub mod fields;
pub mod hash;
pub mod signed;
pub mod statement;
pub mod statements_file;
pub mod text;
pub mod types;
pub mod validation;
pub mod version;

pub use canonical::{EnvelopeField, EnvelopeGrammar, VersionCheck};
pub use constants::{LegalForm, PeopleCount, RatingSubjectType, MAX_STATEMENT_LENGTH};
pub use content::{classify, ContentCodec, StatementContent, TypedContent};
pub use crypto::{generate_key_pair, EncodedKeyPair, Keypair, PublicKey, Signature};
pub use error::{CodecError, Result, ValidationError};
pub use hash::{sha256, Sha256Hash};
pub use signed::{
    build_signed_statement, parse_signed_statement, verify_signed_statement, SignatureBlock,
    SignedStatement, VerificationReport,
};
pub use statement::{
    build_statement, parse_statement, statement_hash, ParseOptions, ParsedStatement, Statement,
    StatementBuilder,
};
pub use statements_file::{generate_statements_file, split_statements, statement_filename};
pub use text::contains_forbidden_chars;
pub use types::{Attachment, StatementType};
pub use validation::{validate_statement, validate_statement_structure, ValidatedStatement};
pub use version::{migrate_v1_to_v2, upgrade, CURRENT_FORMAT_VERSION};
