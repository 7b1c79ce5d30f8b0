//! Golden vectors through the public API.
//!
//! Every implementation of the statement format must produce identical:
//! - canonical text
//! - statement hash
//! - signature block (deterministic Ed25519)

use serde::{Deserialize, Serialize};
use stated_protocol::core::{statement_hash, version};
use stated_protocol::{
    generate_statements_file, parse_signed_statement, Codec, CodecConfig, ProtocolError,
};
use stated_protocol_testkit::vectors::{all_vectors, signature_vectors, vector};

/// A published vector as other implementations consume it.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct GoldenRecord {
    pub name: String,
    pub text: String,
    pub hash: String,
    pub signed_text: String,
}

fn record(name: &str) -> GoldenRecord {
    let sv = signature_vectors()
        .into_iter()
        .next()
        .expect("at least one signature vector");
    let golden = vector(name).expect("vector exists");
    let statement = golden.statement();

    let unsigned = Codec::new(CodecConfig::default()).publish(&statement).unwrap();
    let signed = Codec::with_keypair(sv.keypair(), CodecConfig::default())
        .publish(&statement)
        .unwrap();
    assert_eq!(unsigned.hash, signed.hash);

    GoldenRecord {
        name: name.to_string(),
        text: unsigned.text,
        hash: unsigned.hash,
        signed_text: signed.text,
    }
}

#[test]
fn test_publish_matches_vectors() {
    for golden in all_vectors() {
        let record = record(golden.name);
        assert_eq!(record.text, golden.expected_text, "Vector '{}'", golden.name);
        assert_eq!(record.hash, golden.expected_hash, "Vector '{}'", golden.name);
        assert!(record.signed_text.starts_with(golden.expected_text));
    }
}

#[test]
fn test_signature_vectors() {
    for sv in signature_vectors() {
        let record = record(sv.statement);
        let signed = parse_signed_statement(&record.signed_text).unwrap().unwrap();
        assert_eq!(signed.public_key().to_url_safe(), sv.expected_public_key);
        assert_eq!(signed.signature().to_url_safe(), sv.expected_signature);
        assert_eq!(signed.statement_hash(), record.hash);
        assert!(signed.report().is_valid());
    }
}

#[test]
fn test_records_survive_json() {
    let records: Vec<GoldenRecord> = all_vectors().iter().map(|v| record(v.name)).collect();
    let json = serde_json::to_string(&records).unwrap();
    let back: Vec<GoldenRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, records);

    let codec = Codec::new(CodecConfig::default());
    for record in back {
        let ingested = codec.ingest(&record.signed_text).unwrap();
        assert_eq!(ingested.hash(), record.hash);
    }
}

#[test]
fn test_statements_file_of_vectors() {
    let texts: Vec<String> = all_vectors().iter().map(|v| record(v.name).signed_text).collect();
    let file = generate_statements_file(&texts).unwrap();

    let strict = Codec::new(CodecConfig {
        require_signature: true,
        ..CodecConfig::default()
    });
    let report = strict.ingest_file(&file);
    assert!(report.is_clean(), "rejected: {:?}", report.rejected);
    let hashes: Vec<&str> = report.accepted.iter().map(|i| i.hash()).collect();
    let expected: Vec<&str> = all_vectors().iter().map(|v| v.expected_hash).collect();
    assert_eq!(hashes, expected);
}

#[test]
fn test_legacy_statement_lifecycle() {
    let legacy = "Domain: example.com\nAuthor: Example\nTime: Thu, 04 Mar 2021 11:00:00 +0100\n\
                  Tags: climate\nContent: We support the treaty.\n";

    let codec = Codec::new(CodecConfig::default());
    assert!(matches!(codec.ingest(legacy), Err(ProtocolError::Codec(_))));

    let lenient = Codec::new(CodecConfig {
        allow_no_version: true,
        ..CodecConfig::default()
    });
    let old = lenient.ingest(legacy).unwrap();
    assert_eq!(old.parsed.format_version, "1");

    let migration = codec.migrate_legacy(legacy, None).unwrap();
    assert_eq!(migration.old_hash, statement_hash(legacy));
    let mut text = migration.text.clone();
    while let Some(next) = version::upgrade(&text).unwrap() {
        text = next;
    }
    let current = codec.ingest(&text).unwrap();
    assert_eq!(current.parsed.format_version, version::CURRENT_FORMAT_VERSION);
    assert_eq!(current.parsed.statement.content, old.parsed.statement.content);
    assert_eq!(
        current.parsed.statement.superseded_statement.as_deref(),
        Some(migration.old_hash.as_str())
    );
}
