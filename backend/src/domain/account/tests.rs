//! Tests for the account value types.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn email() -> Email {
    Email::new("john@doe.com").expect("valid email")
}

#[fixture]
fn account(email: Email) -> UserAccount {
    UserAccount::from_parts(UserAccountParts {
        id: UserAccountId::new(VALID_ID).expect("valid id"),
        provider: Provider::new("google").expect("valid provider"),
        social_id: SocialId::new("g-1").expect("valid social id"),
        email: email.clone(),
        is_verified: true,
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        profile: UserProfile {
            username: Username::new("johnny").expect("valid username"),
            bio: Bio::new("hi there").expect("valid bio"),
            social_links: SocialLinks::with_email(&email),
        },
    })
}

#[rstest]
#[case("john@doe.com")]
#[case("a@b")]
#[case("first.last+tag@sub.example.org")]
fn email_accepts_well_formed_addresses(#[case] raw: &str) {
    let email = Email::new(raw).expect("well formed");
    assert_eq!(email.as_str(), raw);
}

#[rstest]
#[case("", AccountValidationError::EmptyEmail)]
#[case("   ", AccountValidationError::EmptyEmail)]
#[case(" john@doe.com", AccountValidationError::MalformedEmail)]
#[case("john doe@x.com", AccountValidationError::MalformedEmail)]
#[case("johndoe.com", AccountValidationError::MalformedEmail)]
#[case("@doe.com", AccountValidationError::MalformedEmail)]
#[case("john@", AccountValidationError::MalformedEmail)]
#[case("a@b@c", AccountValidationError::MalformedEmail)]
fn email_rejects_malformed_addresses(
    #[case] raw: &str,
    #[case] expected: AccountValidationError,
) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn email_rejects_overlong_addresses() {
    let raw = format!("{}@doe.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        Email::new(raw),
        Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX })
    );
}

#[rstest]
fn email_comparison_is_case_sensitive() {
    let lower = Email::new("john@doe.com").expect("valid");
    let upper = Email::new("John@doe.com").expect("valid");
    assert_ne!(lower, upper);
}

#[rstest]
#[case("abc")]
#[case("johnny_99")]
#[case("john.doe")]
#[case("jane-doe")]
#[case("john doe")]
#[case("김철수")]
#[case("j")]
fn username_accepts_any_script_and_punctuation(#[case] raw: &str) {
    assert_eq!(Username::new(raw).expect("valid").as_str(), raw);
}

#[rstest]
#[case("")]
#[case("   ")]
fn username_rejects_blank_values(#[case] raw: &str) {
    assert_eq!(Username::new(raw), Err(AccountValidationError::EmptyUsername));
}

#[rstest]
#[case(" johnny")]
#[case("johnny\t")]
fn username_rejects_surrounding_whitespace(#[case] raw: &str) {
    assert_eq!(
        Username::new(raw),
        Err(AccountValidationError::UsernameSurroundingWhitespace)
    );
}

#[rstest]
fn username_limit_counts_characters_not_bytes() {
    let hangul = "철".repeat(USERNAME_MAX);
    assert_eq!(Username::new(hangul.clone()).expect("at limit").as_str(), hangul);
    assert_eq!(
        Username::new(format!("{hangul}수")),
        Err(AccountValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn bio_may_be_empty() {
    assert_eq!(Bio::new("").expect("empty bio").as_str(), "");
}

#[rstest]
fn bio_rejects_overlong_text() {
    assert_eq!(
        Bio::new("x".repeat(BIO_MAX + 1)),
        Err(AccountValidationError::BioTooLong { max: BIO_MAX })
    );
}

#[rstest]
fn provider_and_social_id_reject_blank_values() {
    assert_eq!(Provider::new(" "), Err(AccountValidationError::EmptyProvider));
    assert_eq!(SocialId::new(""), Err(AccountValidationError::EmptySocialId));
}

#[rstest]
fn account_id_rejects_padded_uuid() {
    let padded = format!(" {VALID_ID}");
    assert_eq!(
        UserAccountId::new(padded),
        Err(AccountValidationError::InvalidAccountId)
    );
}

#[rstest]
fn account_id_serialises_as_string() {
    let id = UserAccountId::new(VALID_ID).expect("valid id");
    assert_eq!(serde_json::to_value(id).expect("serialise"), json!(VALID_ID));
}

#[rstest]
fn social_links_seeded_with_email(email: Email) {
    let links = SocialLinks::with_email(&email);
    assert_eq!(links.get(SocialLinks::EMAIL), Some("john@doe.com"));
    assert_eq!(
        serde_json::to_value(&links).expect("serialise"),
        json!({ "email": "john@doe.com" })
    );
}

#[rstest]
fn account_exposes_assembled_parts(account: UserAccount) {
    assert_eq!(account.id().to_string(), VALID_ID);
    assert_eq!(account.provider().as_str(), "google");
    assert_eq!(account.social_id().as_str(), "g-1");
    assert_eq!(account.email().as_str(), "john@doe.com");
    assert!(account.is_verified());
    assert_eq!(account.profile().username.as_str(), "johnny");
    assert_eq!(account.profile().bio.as_str(), "hi there");
}
