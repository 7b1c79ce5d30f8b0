//! # Stated Protocol
//!
//! Publishing and ingestion of statements: human-readable, hashable and
//! signable claims (verifications, polls, votes, ratings, disputes) in a
//! common text format.
//!
//! ## Overview
//!
//! - **Statements**: Built once from their fields, immutable afterwards
//! - **Typed content**: A closed set of statement types with fixed fields
//! - **Signatures**: An Ed25519 block appended after the statement text
//! - **Format versions**: Every published version keeps parsing forever
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use stated_protocol::{Codec, CodecConfig};
//! use stated_protocol::core::{Keypair, Statement};
//!
//! fn example() -> stated_protocol::Result<()> {
//!     let codec = Codec::with_keypair(Keypair::generate(), CodecConfig::default());
//!
//!     let statement = Statement::builder("example.com", "Example", Utc::now())
//!         .content("We support the treaty.")
//!         .statement();
//!     let published = codec.publish(&statement)?;
//!
//!     let ingested = codec.ingest(&published.text)?;
//!     assert_eq!(ingested.hash(), published.hash);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `stated_protocol::core` - The pure codec (envelope, content, hashes, signatures)

pub mod codec;
pub mod error;

// Re-export the codec crate
pub use stated_protocol_core as core;

// Re-export main types for convenience
pub use codec::{Codec, CodecConfig, IngestReport, Ingested, Migration, Published};
pub use error::{ProtocolError, Result};

// Re-export commonly used core types
pub use stated_protocol_core::{
    build_signed_statement, build_statement, generate_statements_file, parse_signed_statement,
    parse_statement, split_statements, verify_signed_statement, CodecError, Keypair,
    ParseOptions, ParsedStatement, Statement, StatementContent, StatementType, TypedContent,
};
