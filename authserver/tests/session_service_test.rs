mod common;

use common::{harness, harness_with, test_codec, InMemoryUserStore, SpyTokenStore};
use shared::config::AdminSeed;
use shared::security::{SecurityError, TokenKind};
use shared::tool::error::AppError;
use std::time::Duration;

fn s(v: &str) -> String {
    v.to_string()
}

#[tokio::test]
async fn test_register_issues_pair_for_new_user() {
    let h = harness();

    let pair = h
        .svc
        .register(s("alice"), s("a@b.com"), s("hunter2"))
        .await
        .unwrap();

    let user = h.users.user_by_email("a@b.com").unwrap();
    assert!(!user.is_admin);
    assert_ne!(user.password_hash, "hunter2");

    let codec = test_codec();
    let access = codec.parse(&pair.access_token).unwrap();
    let refresh = codec.parse(&pair.refresh_token).unwrap();
    assert_eq!(access.subject, user.id);
    assert_eq!(access.kind, TokenKind::Access);
    assert_eq!(refresh.subject, user.id);
    assert_eq!(refresh.kind, TokenKind::Refresh);
    assert_eq!(access.issued_at, refresh.issued_at);
}

#[tokio::test]
async fn test_register_twice_fails_user_already_exists() {
    let h = harness();

    h.svc
        .register(s("alice"), s("a@b.com"), s("pw1"))
        .await
        .unwrap();
    let err = h
        .svc
        .register(s("alice2"), s("a@b.com"), s("pw2"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserAlreadyExists(email) if email == "a@b.com"));
    assert_eq!(h.users.save_count(), 1);
}

#[tokio::test]
async fn test_register_empty_password_has_no_side_effects() {
    let h = harness();

    let err = h
        .svc
        .register(s("alice"), s("a@b.com"), s(""))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingField(field) if field == "password"));
    assert_eq!(h.users.lookup_count(), 0);
    assert_eq!(h.users.save_count(), 0);
    assert_eq!(h.tokens.save_count(), 0);
}

#[tokio::test]
async fn test_register_empty_email_has_no_side_effects() {
    let h = harness();

    let err = h
        .svc
        .register(s("alice"), s(""), s("pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingField(field) if field == "email"));
    assert_eq!(h.users.lookup_count(), 0);
    assert_eq!(h.users.save_count(), 0);
}

#[tokio::test]
async fn test_register_caches_pair_with_codec_lifetimes() {
    let h = harness();

    let pair = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();

    let saved = h.tokens.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    let (user_id, cached, access_ttl, refresh_ttl) = &saved[0];
    assert_eq!(*user_id, pair.subject);
    assert_eq!(cached, &pair);
    assert_eq!(*access_ttl, Duration::from_secs(15 * 60));
    assert_eq!(*refresh_ttl, Duration::from_secs(7 * 24 * 60 * 60));
}

#[tokio::test]
async fn test_token_cache_failure_does_not_fail_register_or_login() {
    let h = harness_with(InMemoryUserStore::default(), SpyTokenStore::failing());

    let registered = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();
    let logged_in = h.svc.login(s("a@b.com"), s("pw")).await.unwrap();

    assert_eq!(registered.subject, logged_in.subject);
    assert!(!logged_in.access_token.is_empty());
}

#[tokio::test]
async fn test_login_with_correct_password() {
    let h = harness();
    let registered = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();

    let pair = h.svc.login(s("a@b.com"), s("pw")).await.unwrap();

    let parsed = test_codec().parse_access(&pair.access_token).unwrap();
    assert_eq!(parsed.subject, registered.subject);
    assert_eq!(h.tokens.save_count(), 2);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    h.svc
        .register(s("alice"), s("a@b.com"), s("right"))
        .await
        .unwrap();

    let wrong_password = h.svc.login(s("a@b.com"), s("wrong")).await.unwrap_err();
    let unknown_email = h.svc.login(s("nobody@b.com"), s("right")).await.unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(h.tokens.save_count(), 1);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let h = harness();

    assert!(matches!(
        h.svc.login(s(""), s("pw")).await,
        Err(AppError::MissingField(_))
    ));
    assert!(matches!(
        h.svc.login(s("a@b.com"), s("")).await,
        Err(AppError::MissingField(_))
    ));
    assert_eq!(h.users.lookup_count(), 0);
}

#[tokio::test]
async fn test_store_failure_is_not_masked_as_invalid_credentials() {
    let h = harness_with(
        InMemoryUserStore::failing(AppError::DatabaseConnection("refused".into())),
        SpyTokenStore::default(),
    );

    let err = h.svc.login(s("a@b.com"), s("pw")).await.unwrap_err();
    assert!(matches!(err, AppError::DatabaseConnection(_)));

    let err = h.svc.is_admin(3).await.unwrap_err();
    assert!(matches!(err, AppError::DatabaseConnection(_)));
}

#[tokio::test]
async fn test_is_admin() {
    let h = harness();
    let regular = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();
    let admin_id = h
        .svc
        .ensure_admin(&AdminSeed {
            username: s("root"),
            email: s("root@b.com"),
            password: s("rootpw"),
        })
        .await
        .unwrap();

    assert!(!h.svc.is_admin(regular.subject).await.unwrap());
    assert!(h.svc.is_admin(admin_id).await.unwrap());
}

#[tokio::test]
async fn test_is_admin_unknown_user_is_false() {
    let h = harness();

    assert!(!h.svc.is_admin(4242).await.unwrap());
}

#[tokio::test]
async fn test_is_admin_zero_id_is_missing_field() {
    let h = harness();

    let err = h.svc.is_admin(0).await.unwrap_err();
    assert!(matches!(err, AppError::MissingField(field) if field == "user_id"));
    assert_eq!(h.users.lookup_count(), 0);
}

#[tokio::test]
async fn test_ensure_admin_is_idempotent() {
    let h = harness();
    let seed = AdminSeed {
        username: s("root"),
        email: s("root@b.com"),
        password: s("rootpw"),
    };

    let first = h.svc.ensure_admin(&seed).await.unwrap();
    let second = h.svc.ensure_admin(&seed).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.users.save_count(), 1);
    // 시드된 관리자도 일반 로그인 가능
    assert!(h.svc.login(s("root@b.com"), s("rootpw")).await.is_ok());
}

#[tokio::test]
async fn test_refresh_returns_pair_for_same_subject() {
    let h = harness();
    let registered = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();

    let refreshed = h.svc.refresh(registered.refresh_token.clone()).await.unwrap();

    assert_eq!(refreshed.subject, registered.subject);
    let codec = test_codec();
    assert_eq!(
        codec.parse_access(&refreshed.access_token).unwrap().subject,
        registered.subject
    );
    // 이전 refresh 토큰은 만료 전까지 유효
    assert!(codec.parse(&registered.refresh_token).is_ok());
    assert_eq!(h.tokens.save_count(), 2);
}

#[tokio::test]
async fn test_refresh_with_access_token_is_wrong_kind() {
    let h = harness();
    let registered = h
        .svc
        .register(s("alice"), s("a@b.com"), s("pw"))
        .await
        .unwrap();

    let err = h.svc.refresh(registered.access_token).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Security(SecurityError::WrongTokenKind {
            expected: TokenKind::Refresh,
            actual: TokenKind::Access,
        })
    ));
}

#[tokio::test]
async fn test_refresh_rejects_garbage_and_empty() {
    let h = harness();

    assert!(matches!(
        h.svc.refresh(s("not.a.jwt")).await,
        Err(AppError::Security(SecurityError::MalformedToken))
    ));
    assert!(matches!(
        h.svc.refresh(s("")).await,
        Err(AppError::MissingField(_))
    ));
    assert_eq!(h.tokens.save_count(), 0);
}
