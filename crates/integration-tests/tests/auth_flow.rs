//! Auth flow properties: sign-up, the unverified-email branch, the
//! verification round trip, create-once user records, and auth events.

use std::sync::Arc;

use terry_store_core::Role;
use terry_store_integration_tests::{token_from_url, RecordingMailer, TEST_BASE_URL};
use terry_store_site::db::MemoryStore;
use terry_store_site::models::CurrentUser;
use terry_store_site::services::{AuthContext, AuthError, AuthEvent, AuthEvents, AuthService};

struct Harness {
    auth: AuthService,
    mailer: Arc<RecordingMailer>,
    events: AuthEvents,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let events = AuthEvents::new();
    let auth = AuthService::new(
        Arc::clone(&store) as _,
        Arc::clone(&mailer) as _,
        events.clone(),
        TEST_BASE_URL,
    );
    Harness {
        auth,
        mailer,
        events,
    }
}

#[tokio::test]
async fn test_sign_up_creates_unverified_user_with_default_role() {
    let h = harness();

    let user = h
        .auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    assert_eq!(user.role, Role::User);
    assert!(!user.email_verified);

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "terry@example.com");
    assert!(sent[0].verify_url.starts_with(TEST_BASE_URL));
}

#[tokio::test]
async fn test_sign_up_rejects_duplicate_email() {
    let h = harness();

    h.auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    let err = h
        .auth
        .sign_up("Other", "terry@example.com", "another password")
        .await
        .expect_err("duplicate must be rejected");
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_unverified_sign_in_is_distinguished_from_bad_credentials() {
    let h = harness();

    h.auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    // Correct password, unverified email: the distinguished condition.
    let err = h
        .auth
        .sign_in("terry@example.com", "sufficiently long")
        .await
        .expect_err("unverified sign-in must fail");
    assert!(matches!(err, AuthError::UnverifiedEmail));

    // Wrong password: the generic condition.
    let err = h
        .auth
        .sign_in("terry@example.com", "wrong password")
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_verification_round_trip_enables_sign_in() {
    let h = harness();

    h.auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    let url = h.mailer.last_verify_url().expect("no verification mail");
    let token = token_from_url(&url).expect("no token in URL");

    let verified = h.auth.verify_email(token).await.expect("verify failed");
    assert!(verified.email_verified);

    let user = h
        .auth
        .sign_in("terry@example.com", "sufficiently long")
        .await
        .expect("sign-in after verification failed");
    assert_eq!(user.id, verified.id);

    // Tokens are single-use.
    let err = h
        .auth
        .verify_email(token)
        .await
        .expect_err("token reuse must fail");
    assert!(matches!(err, AuthError::InvalidVerificationToken));
}

#[tokio::test]
async fn test_google_sign_in_creates_record_once_and_never_overwrites() {
    let h = harness();

    let first = h
        .auth
        .sign_in_with_google(Some("Terry"), "terry@gmail.test", true)
        .await
        .expect("google sign-in failed");
    assert_eq!(first.role, Role::User);
    assert_eq!(first.name, "Terry");
    assert!(first.email_verified);

    // Second sign-in with a different asserted name: the stored record
    // stays as created.
    let second = h
        .auth
        .sign_in_with_google(Some("Terencio"), "terry@gmail.test", true)
        .await
        .expect("google sign-in failed");
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Terry");
}

#[tokio::test]
async fn test_resend_verification_requires_active_session() {
    let h = harness();

    let err = h
        .auth
        .resend_verification_email(&AuthContext::anonymous())
        .await
        .expect_err("resend without session must fail");
    assert!(matches!(err, AuthError::Access(_)));
}

#[tokio::test]
async fn test_resend_verification_sends_for_signed_in_user() {
    let h = harness();

    let user = h
        .auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    let ctx = AuthContext::for_user(CurrentUser::from(&user));
    h.auth
        .resend_verification_email(&ctx)
        .await
        .expect("resend failed");

    // Sign-up mail plus the resend.
    assert_eq!(h.mailer.sent().len(), 2);
}

#[tokio::test]
async fn test_auth_events_are_published_on_the_channel() {
    let h = harness();
    let mut rx = h.events.subscribe();

    let user = h
        .auth
        .sign_up("Terry", "terry@example.com", "sufficiently long")
        .await
        .expect("sign-up failed");

    assert_eq!(
        rx.recv().await.expect("no event"),
        AuthEvent::SignedUp { user_id: user.id }
    );

    let url = h.mailer.last_verify_url().expect("no verification mail");
    let token = token_from_url(&url).expect("no token in URL");
    h.auth.verify_email(token).await.expect("verify failed");

    assert_eq!(
        rx.recv().await.expect("no event"),
        AuthEvent::EmailVerified { user_id: user.id }
    );

    h.auth
        .sign_in("terry@example.com", "sufficiently long")
        .await
        .expect("sign-in failed");

    assert_eq!(
        rx.recv().await.expect("no event"),
        AuthEvent::SignedIn { user_id: user.id }
    );
}
