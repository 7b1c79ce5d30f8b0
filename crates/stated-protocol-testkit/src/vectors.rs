//! Golden test vectors for canonical statement text.
//!
//! Every implementation of the statement format must produce these exact
//! texts and hashes; peers compare statements by hash, so a single byte of
//! difference splits the network.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use stated_protocol_core::{statement_hash, Keypair, Statement};

/// A golden statement vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub domain: &'static str,
    pub author: &'static str,
    pub representative: Option<&'static str>,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub tags: &'static [&'static str],
    pub content: &'static str,
    pub translations: &'static [(&'static str, &'static str)],
    /// Expected canonical text.
    pub expected_text: &'static str,
    /// Expected statement hash (URL-safe base64).
    pub expected_hash: &'static str,
}

impl GoldenVector {
    pub fn time(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.timestamp, 0)
            .single()
            .unwrap_or_default()
    }

    /// The statement described by this vector.
    pub fn statement(&self) -> Statement {
        let mut builder = Statement::builder(self.domain, self.author, self.time())
            .tags(self.tags.iter().copied())
            .content(self.content);
        if let Some(representative) = self.representative {
            builder = builder.representative(representative);
        }
        for (lang, text) in self.translations {
            builder = builder.translation(*lang, *text);
        }
        builder.statement()
    }
}

/// A golden signature vector over one of the statement vectors.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureVector {
    pub name: &'static str,
    /// Ed25519 seed.
    pub seed: [u8; 32],
    /// Name of the signed [`GoldenVector`].
    pub statement: &'static str,
    pub expected_public_key: &'static str,
    pub expected_signature: &'static str,
}

impl SignatureVector {
    pub fn keypair(&self) -> Keypair {
        Keypair::from_seed(&self.seed)
    }
}

const VOTE_CONTENT: &str =
    "\n\tType: Vote\n\tPoll id: cHFl6ZhLUdzfHKfMm2_npeyYq29xRX6bolz20pJLio4\n\tPoll: Lunch?\n\tOption: Pizza\n";

/// Get all golden statement vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "plain statement",
            domain: "example.com",
            author: "Example",
            representative: None,
            timestamp: 1_704_067_200, // 2024-01-01T00:00:00Z
            tags: &[],
            content: "We support the treaty.",
            translations: &[],
            expected_text: "Publishing domain: example.com\n\
                            Author: Example\n\
                            Time: Mon, 01 Jan 2024 00:00:00 GMT\n\
                            Format version: 5\n\
                            Statement content: We support the treaty.\n",
            expected_hash: "B4LonTMOnGCo3lJQGzut6Dsky8hKvpI4bYPTssOfPEs",
        },
        GoldenVector {
            name: "tagged statement",
            domain: "rixdata.net",
            author: "Example Inc.",
            representative: None,
            timestamp: 1_700_000_000,
            tags: &["climate", " energy "],
            content: "hello world",
            translations: &[],
            expected_text: "Publishing domain: rixdata.net\n\
                            Author: Example Inc.\n\
                            Time: Tue, 14 Nov 2023 22:13:20 GMT\n\
                            Tags: climate, energy\n\
                            Format version: 5\n\
                            Statement content: hello world\n",
            expected_hash: "vOEWL-C9Si9y126MGVzKHf3Wr5J4nlIzFyuQUSW_Tl0",
        },
        GoldenVector {
            name: "vote",
            domain: "example.com",
            author: "Example",
            representative: None,
            timestamp: 1_704_067_200,
            tags: &[],
            content: VOTE_CONTENT,
            translations: &[],
            expected_text: "Publishing domain: example.com\n\
                            Author: Example\n\
                            Time: Mon, 01 Jan 2024 00:00:00 GMT\n\
                            Format version: 5\n\
                            Statement content: \n\
                            \tType: Vote\n\
                            \tPoll id: cHFl6ZhLUdzfHKfMm2_npeyYq29xRX6bolz20pJLio4\n\
                            \tPoll: Lunch?\n\
                            \tOption: Pizza\n",
            expected_hash: "JNl7FOSGS420Hb3sOVQ6WqEdz5_DR9uWUEj8Sy8-xGM",
        },
        GoldenVector {
            name: "representative and translations",
            domain: "example.com",
            author: "Example",
            representative: Some("Jane Doe"),
            timestamp: 1_704_067_200,
            tags: &[],
            content: "Hello",
            translations: &[("fr", "Bonjour"), ("de", "Hallo")],
            expected_text: "Publishing domain: example.com\n\
                            Author: Example\n\
                            Authorized signing representative: Jane Doe\n\
                            Time: Mon, 01 Jan 2024 00:00:00 GMT\n\
                            Format version: 5\n\
                            Translations: de, fr\n\
                            Statement content: Hello\n\
                            Translation de: Hallo\n\
                            Translation fr: Bonjour\n",
            expected_hash: "bo60qAQJtVuoP8tV1_VDVskb-OYweKpQ2m34DZEOfFM",
        },
    ]
}

/// Get all golden signature vectors.
pub fn signature_vectors() -> Vec<SignatureVector> {
    vec![SignatureVector {
        name: "plain statement signed with seed 0x42",
        seed: [0x42; 32],
        statement: "plain statement",
        expected_public_key: "IVL40Zt5HSRFMkLhXy6rbLfP-ntqXtMAl5YOBpiB2xI",
        expected_signature: "i8pM0LdniSYJrS_QR1B66VEbw0I4MOqekAH26tfJ7KM3u6RA4vLEgRScwde1mGXOCsDJNwp1dzvtqm6hB6jmDQ",
    }]
}

/// Look up a statement vector by name.
pub fn vector(name: &str) -> Option<GoldenVector> {
    all_vectors().into_iter().find(|v| v.name == name)
}

/// Check every statement vector against this implementation.
///
/// Returns the name, whether text and hash matched, and the computed hash.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let (matches, hash) = match v.statement().to_text() {
                Ok(text) => {
                    let hash = statement_hash(&text);
                    (text == v.expected_text && hash == v.expected_hash, hash)
                }
                Err(e) => (false, e.to_string()),
            };
            (v.name.to_string(), matches, hash)
        })
        .collect()
}

/// All vectors as pretty-printed JSON, for other implementations to consume.
pub fn vectors_json() -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Export {
        statements: Vec<GoldenVector>,
        signatures: Vec<SignatureVector>,
    }
    serde_json::to_string_pretty(&Export {
        statements: all_vectors(),
        signatures: signature_vectors(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stated_protocol_core::{parse_statement, ParseOptions};

    #[test]
    fn test_vectors_match() {
        for (name, matches, hash) in verify_all_vectors() {
            assert!(matches, "Vector '{}' produced hash {}", name, hash);
        }
    }

    #[test]
    fn test_vectors_parse_back() {
        for vector in all_vectors() {
            let parsed = parse_statement(vector.expected_text, ParseOptions::default()).unwrap();
            assert_eq!(parsed.hash, vector.expected_hash, "Vector '{}'", vector.name);
            assert_eq!(parsed.statement.domain, vector.domain);
            assert_eq!(parsed.statement.time, vector.time());
            assert_eq!(parsed.statement.translations, vector.statement().translations);
        }
    }

    #[test]
    fn test_signature_vectors() {
        for sv in signature_vectors() {
            let keypair = sv.keypair();
            assert_eq!(keypair.public_key().to_url_safe(), sv.expected_public_key);

            let statement = vector(sv.statement).unwrap();
            let signed = keypair.sign_statement(statement.expected_text).unwrap();
            assert!(signed.contains(&format!("Signature: {}\n", sv.expected_signature)));
            assert!(signed.contains(&format!("Statement hash: {}\n", statement.expected_hash)));
        }
    }

    #[test]
    fn test_json_export() {
        let json = vectors_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["statements"].as_array().unwrap().len(), all_vectors().len());
        assert_eq!(value["signatures"][0]["statement"], "plain statement");
    }
}
