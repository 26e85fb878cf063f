use std::time::Duration;

use rusty_gate::auth::token::{TokenIssuer, TokenKind};
use rusty_gate::auth::user::User;
use rusty_gate::error::RustyGateError;

fn issuer(access_secret: &str, refresh_secret: &str) -> TokenIssuer {
    TokenIssuer::new(
        access_secret,
        Duration::from_secs(900),
        refresh_secret,
        Duration::from_secs(3600),
    )
}

fn test_user() -> User {
    User::new(
        "alice@example.com".to_string(),
        "Alice".to_string(),
        "digest".to_string(),
    )
}

#[tokio::test]
async fn test_pair_round_trip() {
    let issuer = issuer(
        "integration-access-secret-0123456789",
        "integration-refresh-secret-0123456789",
    );
    let user = test_user();

    let pair = issuer.issue(&user).await.unwrap();

    let access = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
    assert_eq!(access.sub, user.id);
    assert_eq!(access.email, "alice@example.com");
    assert!(access.is_active);

    let refresh = issuer
        .verify(&pair.refresh_token, TokenKind::Refresh)
        .unwrap();
    assert_eq!(refresh.sub, user.id);
}

#[tokio::test]
async fn test_token_from_other_issuer_rejected() {
    let trusted = issuer(
        "integration-access-secret-0123456789",
        "integration-refresh-secret-0123456789",
    );
    let rogue = issuer(
        "rogue-access-secret-0123456789-xxxxx",
        "rogue-refresh-secret-0123456789-xxxxx",
    );

    let pair = rogue.issue(&test_user()).await.unwrap();

    let result = trusted.verify(&pair.access_token, TokenKind::Access);
    assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));

    let result = trusted.verify(&pair.refresh_token, TokenKind::Refresh);
    assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));
}

#[tokio::test]
async fn test_access_and_refresh_secrets_are_separate() {
    let issuer = issuer(
        "integration-access-secret-0123456789",
        "integration-refresh-secret-0123456789",
    );
    let pair = issuer.issue(&test_user()).await.unwrap();

    // A leaked access token must not be usable where a refresh token is
    // expected, and vice versa
    assert!(issuer.verify(&pair.access_token, TokenKind::Refresh).is_err());
    assert!(issuer.verify(&pair.refresh_token, TokenKind::Access).is_err());
}
