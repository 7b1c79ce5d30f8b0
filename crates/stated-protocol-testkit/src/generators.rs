//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use proptest::strategy::Union;

use stated_protocol_core::constants::{LegalForm, PeopleCount, RatingSubjectType};
use stated_protocol_core::content::{
    Bounty, Boycott, Confidence, DisputeAuthenticity, DisputeContent, Observation,
    OrganisationVerification, PdfSigning, PersonVerification, Poll, PollScope, Quotation, Rating,
    RatingValue, Response, Vote,
};
use stated_protocol_core::{sha256, Keypair, Statement, StatementContent, TypedContent};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a publishing domain.
pub fn domain() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}\\.(com|org|net|de)".prop_map(String::from)
}

/// Generate an author display name.
pub fn author() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z .&]{0,30}".prop_map(String::from)
}

/// Generate a single tag.
pub fn tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 ]{0,15}[a-z0-9]".prop_map(String::from)
}

/// Generate a two letter language code.
pub fn language() -> impl Strategy<Value = String> {
    "[a-z]{2}".prop_map(String::from)
}

/// Generate one line of Unicode text.
///
/// Besides ordinary text, a line may look like `Label: value`, a `---`
/// rule or a `Translation xxx: ` marker. Markers use three letter codes
/// and [`language`] two letter ones, so they never collide with a declared
/// translation.
pub fn text_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[\\p{L}\\p{N}\\p{P}\\p{S}][\\p{L}\\p{N}\\p{P}\\p{S}\\p{Zs}]{0,40}",
        1 => "[\\p{L}][\\p{L} ]{0,15}: [\\p{L}\\p{N}\\p{P}\\p{S} ]{0,30}",
        1 => Just("---".to_string()),
        1 => "Translation [a-z]{3}: [\\p{L} ]{0,20}",
    ]
}

/// Generate one to four lines of Unicode text, without a closing newline.
pub fn unicode_text() -> impl Strategy<Value = String> {
    prop::collection::vec(text_line(), 1..=4).prop_map(|lines| lines.join("\n"))
}

/// Generate plain content as the parser returns it: closed by a newline.
pub fn plain_content() -> impl Strategy<Value = String> {
    unicode_text().prop_map(|text| text + "\n")
}

/// Generate a publication time in whole seconds.
pub fn time() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01 .. 2100-01-01
    (946_684_800i64..4_102_444_800i64).prop_map(|secs| {
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or_default()
    })
}

/// Generate a statement hash.
pub fn statement_hash() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(|bytes| sha256(bytes))
}

// ────────────────────────────────────────────────────────────────────────────
// Typed content
// ────────────────────────────────────────────────────────────────────────────

/// Generate a non-empty single-line field value.
pub fn field_value() -> impl Strategy<Value = String> {
    "[\\p{L}\\p{N}\\p{P}\\p{S}][\\p{L}\\p{N}\\p{P}\\p{S}\\p{Zs}]{0,24}".prop_map(String::from)
}

fn opt_value() -> impl Strategy<Value = Option<String>> {
    prop::option::of(field_value())
}

/// Generate a confidence in steps of 0.001.
pub fn confidence() -> impl Strategy<Value = Confidence> {
    (0u32..=1000).prop_filter_map("in range", |n| Confidence::new(f64::from(n) / 1000.0))
}

fn coordinate(bound: i32) -> impl Strategy<Value = f64> {
    (-bound * 1000..=bound * 1000).prop_map(|n| f64::from(n) / 1000.0)
}

fn people_count() -> impl Strategy<Value = PeopleCount> {
    prop::sample::select(PeopleCount::ALL.to_vec())
}

fn legal_form() -> impl Strategy<Value = LegalForm> {
    prop::sample::select(LegalForm::ALL.to_vec())
}

pub fn organisation_verification() -> impl Strategy<Value = OrganisationVerification> {
    (
        (
            field_value(),
            opt_value(),
            field_value(),
            legal_form(),
            domain(),
            prop::option::of(domain()),
            opt_value(),
            opt_value(),
        ),
        (
            opt_value(),
            opt_value(),
            prop::option::of(coordinate(90)),
            prop::option::of(coordinate(180)),
            prop::option::of(people_count()),
            prop::option::of(statement_hash()),
            prop::option::of(people_count()),
            opt_value(),
            prop::option::of(confidence()),
        ),
    )
        .prop_map(
            |(
                (name, english_name, country, legal_form, domain, foreign_domain, department, province),
                (serial_number, city, latitude, longitude, population, logo, employee_count, reliability_policy, confidence),
            )| OrganisationVerification {
                name,
                english_name,
                country,
                legal_form,
                domain: Some(domain),
                foreign_domain,
                department,
                province,
                serial_number,
                city,
                latitude,
                longitude,
                population,
                logo,
                employee_count,
                reliability_policy,
                confidence,
            },
        )
}

pub fn person_verification() -> impl Strategy<Value = PersonVerification> {
    let birth_date = (1900i32..2020, 1u32..=12, 1u32..=28)
        .prop_filter_map("valid date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
    (
        (field_value(), birth_date, field_value(), field_value(), opt_value(), opt_value()),
        (
            prop::option::of(domain()),
            prop::option::of(domain()),
            prop::option::of(statement_hash()),
            opt_value(),
            prop::option::of(confidence()),
            opt_value(),
        ),
    )
        .prop_map(
            |(
                (name, date_of_birth, city_of_birth, country_of_birth, job_title, employer),
                (own_domain, foreign_domain, picture, verification_method, confidence, reliability_policy),
            )| PersonVerification {
                name,
                date_of_birth,
                city_of_birth,
                country_of_birth,
                job_title,
                employer,
                own_domain,
                foreign_domain,
                picture,
                verification_method,
                confidence,
                reliability_policy,
            },
        )
}

pub fn poll_scope() -> impl Strategy<Value = PollScope> {
    (
        field_value(),
        opt_value(),
        opt_value(),
        prop::option::of(legal_form()),
        prop::collection::vec(domain(), 0..3),
        opt_value(),
        opt_value(),
        opt_value(),
        opt_value(),
    )
        .prop_map(
            |(
                description,
                country,
                city,
                legal_form,
                domain_scope,
                required_property,
                required_property_value,
                required_property_observer,
                scope_query_link,
            )| PollScope {
                description,
                country,
                city,
                legal_form,
                domain_scope,
                required_property,
                required_property_value,
                required_property_observer,
                scope_query_link,
            },
        )
}

pub fn poll() -> impl Strategy<Value = Poll> {
    (
        opt_value(),
        prop::option::of(time()),
        field_value(),
        prop::collection::vec(field_value(), 2..=5),
        prop::option::of(any::<bool>()),
        prop::option::of(poll_scope()),
    )
        .prop_map(|(judges, deadline, poll, options, allow_arbitrary_vote, scope)| Poll {
            judges,
            deadline,
            poll,
            options,
            allow_arbitrary_vote,
            scope,
        })
}

pub fn vote() -> impl Strategy<Value = Vote> {
    (statement_hash(), field_value(), field_value()).prop_map(|(poll_hash, poll, vote)| Vote {
        poll_hash,
        poll,
        vote,
    })
}

pub fn rating() -> impl Strategy<Value = Rating> {
    (
        prop::option::of(prop::sample::select(RatingSubjectType::ALL.to_vec())),
        field_value(),
        opt_value(),
        prop::option::of(statement_hash()),
        opt_value(),
        (1u8..=5).prop_filter_map("stars", RatingValue::new),
        opt_value(),
    )
        .prop_map(
            |(subject_type, subject_name, subject_reference, document_file_hash, quality, rating, comment)| Rating {
                subject_type,
                subject_name,
                subject_reference,
                document_file_hash,
                quality,
                rating,
                comment,
            },
        )
}

pub fn dispute_authenticity() -> impl Strategy<Value = DisputeAuthenticity> {
    (statement_hash(), prop::option::of(confidence()), opt_value()).prop_map(
        |(hash, confidence, reliability_policy)| DisputeAuthenticity {
            hash,
            confidence,
            reliability_policy,
        },
    )
}

pub fn dispute_content() -> impl Strategy<Value = DisputeContent> {
    (statement_hash(), prop::option::of(confidence()), opt_value()).prop_map(
        |(hash, confidence, reliability_policy)| DisputeContent {
            hash,
            confidence,
            reliability_policy,
        },
    )
}

pub fn response() -> impl Strategy<Value = Response> {
    (statement_hash(), field_value()).prop_map(|(hash, response)| Response { hash, response })
}

pub fn pdf_signing() -> impl Strategy<Value = PdfSigning> {
    prop::option::of(statement_hash()).prop_map(|hash| PdfSigning { hash })
}

pub fn bounty() -> impl Strategy<Value = Bounty> {
    (opt_value(), field_value(), field_value(), field_value(), opt_value()).prop_map(
        |(motivation, bounty, reward, judge, judge_pay)| Bounty {
            motivation,
            bounty,
            reward,
            judge,
            judge_pay,
        },
    )
}

pub fn observation() -> impl Strategy<Value = Observation> {
    (
        opt_value(),
        prop::option::of(confidence()),
        opt_value(),
        field_value(),
        opt_value(),
        opt_value(),
        field_value(),
        opt_value(),
    )
        .prop_map(
            |(approach, confidence, reliability_policy, subject, subject_reference, observation_reference, property, value)| {
                Observation {
                    approach,
                    confidence,
                    reliability_policy,
                    subject,
                    subject_reference,
                    observation_reference,
                    property,
                    value,
                }
            },
        )
}

pub fn boycott() -> impl Strategy<Value = Boycott> {
    (opt_value(), field_value(), opt_value()).prop_map(|(description, subject, subject_reference)| Boycott {
        description,
        subject,
        subject_reference,
    })
}

/// Generate a quotation whose paraphrase, if any, is free text or a
/// non-quotation typed block.
pub fn quotation() -> impl Strategy<Value = Quotation> {
    let paraphrase = prop_oneof![
        field_value().prop_map(StatementContent::Plain),
        leaf_typed_content().prop_map(StatementContent::Typed),
    ];
    (
        field_value(),
        statement_hash(),
        prop::option::of(time()),
        opt_value(),
        prop::option::of(statement_hash()),
        prop::option::of(confidence()),
        opt_value(),
        prop::option::of(paraphrase.prop_map(Box::new)),
    )
        .prop_map(
            |(original_author, author_verification, original_time, source, picture, confidence, quotation, paraphrased_statement)| {
                Quotation {
                    original_author,
                    author_verification,
                    original_time,
                    source,
                    picture,
                    confidence,
                    quotation,
                    paraphrased_statement,
                }
            },
        )
}

/// Every typed content except quotations.
fn leaf_typed_content() -> BoxedStrategy<TypedContent> {
    Union::new(vec![
        organisation_verification().prop_map(TypedContent::OrganisationVerification).boxed(),
        person_verification().prop_map(TypedContent::PersonVerification).boxed(),
        poll().prop_map(TypedContent::Poll).boxed(),
        vote().prop_map(TypedContent::Vote).boxed(),
        rating().prop_map(TypedContent::Rating).boxed(),
        dispute_authenticity().prop_map(TypedContent::DisputeAuthenticity).boxed(),
        dispute_content().prop_map(TypedContent::DisputeContent).boxed(),
        response().prop_map(TypedContent::Response).boxed(),
        pdf_signing().prop_map(TypedContent::SignPdf).boxed(),
        bounty().prop_map(TypedContent::Bounty).boxed(),
        observation().prop_map(TypedContent::Observation).boxed(),
        boycott().prop_map(TypedContent::Boycott).boxed(),
    ])
    .boxed()
}

/// Generate typed content of any statement type.
pub fn typed_content() -> impl Strategy<Value = TypedContent> {
    prop_oneof![
        1 => quotation().prop_map(TypedContent::Quotation),
        12 => leaf_typed_content(),
    ]
}

/// Parameters for generating a statement.
#[derive(Debug, Clone)]
pub struct StatementParams {
    pub domain: String,
    pub author: String,
    pub representative: Option<String>,
    pub time: DateTime<Utc>,
    pub tags: Vec<String>,
    pub content: String,
    pub superseded_statement: Option<String>,
    pub translations: BTreeMap<String, String>,
}

impl Arbitrary for StatementParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            domain(),
            author(),
            prop::option::of(author()),
            time(),
            prop::collection::vec(tag(), 0..4),
            plain_content(),
            prop::option::of(statement_hash()),
            prop::collection::btree_map(language(), unicode_text(), 0..3),
        )
            .prop_map(
                |(domain, author, representative, time, tags, content, superseded_statement, translations)| {
                    StatementParams {
                        domain,
                        author,
                        representative,
                        time,
                        tags,
                        content,
                        superseded_statement,
                        translations,
                    }
                },
            )
            .boxed()
    }
}

/// Generate a statement from parameters.
pub fn statement_from_params(params: &StatementParams) -> Statement {
    let mut builder = Statement::builder(&params.domain, &params.author, params.time)
        .tags(params.tags.iter().cloned())
        .content(&params.content);
    if let Some(representative) = &params.representative {
        builder = builder.representative(representative);
    }
    if let Some(hash) = &params.superseded_statement {
        builder = builder.superseded_statement(hash);
    }
    for (lang, text) in &params.translations {
        builder = builder.translation(lang, text);
    }
    builder.statement()
}
