//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use chrono::{DateTime, TimeZone, Utc};

use stated_protocol_core::content::{ContentCodec, Poll, Rating, RatingValue, Vote};
use stated_protocol_core::{build_statement, statement_hash, Keypair, PublicKey, Statement};

/// Default publishing domain of fixture statements.
pub const FIXTURE_DOMAIN: &str = "example.com";

/// A test fixture with a signing identity.
#[derive(Debug, Clone)]
pub struct TestFixture {
    pub keypair: Keypair,
    pub domain: String,
    pub author: String,
    /// Publication time of every statement the fixture makes.
    pub time: DateTime<Utc>,
}

impl TestFixture {
    /// Create a fixture with a fixed keypair, so outputs are reproducible.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            domain: FIXTURE_DOMAIN.to_string(),
            author: "Example".to_string(),
            time: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    /// Create with a random keypair.
    pub fn random() -> Self {
        Self {
            keypair: Keypair::generate(),
            ..Self::new()
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// A statement from this fixture's identity with the given content.
    pub fn statement(&self, content: impl Into<String>) -> Statement {
        Statement::builder(&self.domain, &self.author, self.time)
            .content(content)
            .statement()
    }

    /// A plain text statement.
    pub fn plain_statement(&self, text: &str) -> Statement {
        self.statement(text)
    }

    /// A poll with two options.
    pub fn poll_statement(&self) -> Statement {
        let poll = Poll::new("Lunch?", vec!["Pizza".to_string(), "Salad".to_string()]);
        self.statement(typed(&poll))
    }

    /// A vote on the poll from [`TestFixture::poll_statement`].
    pub fn vote_statement(&self, option: &str) -> Statement {
        let poll_hash = build_statement(&self.poll_statement())
            .map(|text| statement_hash(&text))
            .unwrap_or_default();
        let vote = Vote {
            poll_hash,
            poll: "Lunch?".to_string(),
            vote: option.to_string(),
        };
        self.statement(typed(&vote))
    }

    /// A four star rating of `subject`.
    pub fn rating_statement(&self, subject: &str) -> Statement {
        let stars = RatingValue::new(4).unwrap_or_else(|| unreachable!("4 is a valid rating"));
        self.statement(typed(&Rating::new(subject, stars)))
    }

    /// Encode and sign a statement with the fixture's key.
    pub fn signed_text(&self, statement: &Statement) -> String {
        build_statement(statement)
            .and_then(|text| self.keypair.sign_statement(&text))
            .unwrap_or_else(|e| panic!("fixture statement failed to encode: {e}"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn typed(content: &impl ContentCodec) -> String {
    content
        .build_content()
        .unwrap_or_else(|e| panic!("fixture content failed to build: {e}"))
}

/// Create multiple test fixtures for multi-party tests.
///
/// Each party publishes from its own domain `party-<i>.example`.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture {
                domain: format!("party-{i}.example"),
                author: format!("Party {i}"),
                ..TestFixture::with_seed(seed)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stated_protocol_core::{parse_statement, verify_signed_statement, ParseOptions, StatementType};

    #[test]
    fn test_fixture_is_deterministic() {
        let a = TestFixture::new();
        let b = TestFixture::new();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.signed_text(&a.poll_statement()), b.signed_text(&b.poll_statement()));
    }

    #[test]
    fn test_fixture_statements_parse() {
        let fixture = TestFixture::new();
        let cases = [
            (fixture.plain_statement("hello"), None),
            (fixture.poll_statement(), Some(StatementType::Poll)),
            (fixture.vote_statement("Pizza"), Some(StatementType::Vote)),
            (fixture.rating_statement("Example Hotel"), Some(StatementType::Rating)),
        ];
        for (statement, expected) in cases {
            let text = fixture.signed_text(&statement);
            assert!(verify_signed_statement(&text));
            let parsed = parse_statement(&text, ParseOptions::default()).unwrap();
            assert_eq!(parsed.statement_type, expected);
        }
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        // Each party has unique keys
        let pks: Vec<_> = parties.iter().map(|p| p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
        assert_eq!(parties[2].domain, "party-2.example");
    }
}
