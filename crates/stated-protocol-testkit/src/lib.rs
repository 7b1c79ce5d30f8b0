//! # Stated Protocol Testkit
//!
//! Testing utilities for the stated protocol.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Statement texts, hashes and signatures every implementation must reproduce
//! - **Generators**: Proptest strategies for statements, Unicode text and every typed content
//! - **Fixtures**: Deterministic identities and sample statements
//!
//! ## Golden Vectors
//!
//! ```rust
//! use stated_protocol_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hash) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stated_protocol_testkit::generators::{statement_from_params, StatementParams};
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(params: StatementParams) {
//!         let s = statement_from_params(&params);
//!         prop_assert_eq!(s.hash().unwrap(), s.hash().unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use stated_protocol_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture.signed_text(&fixture.poll_statement());
//! assert!(stated_protocol_core::verify_signed_statement(&signed));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{statement_from_params, StatementParams};
pub use vectors::{all_vectors, signature_vectors, verify_all_vectors, GoldenVector, SignatureVector};
