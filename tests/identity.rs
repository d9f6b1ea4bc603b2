//! Sign-up, login and password recovery against a real SQLite database.

mod common;

use cafe_storefront::application::OnboardingInput;
use cafe_storefront::domain::product::NewImage;
use cafe_storefront::domain::verification::VerificationKind;
use cafe_storefront::domain::{DomainError, UserRole};
use common::{TestApp, PASSWORD};

#[tokio::test]
async fn sign_up_creates_a_customer_and_signs_in() {
    let app = TestApp::new().await;

    let auth = app.sign_up("Alice@Example.com", "alice").await;
    assert_eq!(auth.user.username, "alice");
    assert_eq!(auth.user.email, "alice@example.com");
    assert_eq!(auth.user.role, UserRole::Customer);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.token.is_empty());

    let by_name = app.services.users.login("alice", PASSWORD, false).await.unwrap();
    let by_email = app
        .services
        .users
        .login("ALICE@example.com", PASSWORD, true)
        .await
        .unwrap();
    assert_eq!(by_name.user.id, by_email.user.id);
    assert!(by_email.expires_in > by_name.expires_in);
    assert!(by_email.user.last_login_at.is_some());
}

#[tokio::test]
async fn verification_mail_carries_code_and_link() {
    let app = TestApp::new().await;

    let redirect = app.services.users.register("alice@example.com").await.unwrap();
    assert!(redirect.contains("type=onboarding"));
    assert!(!redirect.contains("code="));

    let mail = app.mailer.messages_to("alice@example.com");
    assert_eq!(mail.len(), 1);
    let code = app.mailer.last_code_for("alice@example.com").unwrap();
    assert!(mail[0].text.contains(&code));
    assert!(mail[0].text.contains("http://shop.test/"));
}

#[tokio::test]
async fn taken_email_cannot_register_again() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;

    let err = app
        .services
        .users
        .register("alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = app.services.users.register("not-an-email").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn wrong_codes_burn_the_verification() {
    let app = TestApp::new().await;
    app.services.users.register("alice@example.com").await.unwrap();
    let code = app.mailer.last_code_for("alice@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..app.config.verification.max_attempts {
        let err = app
            .services
            .users
            .verify(VerificationKind::Onboarding, "alice@example.com", wrong)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    // The right code no longer works once attempts are exhausted.
    let err = app
        .services
        .users
        .verify(VerificationKind::Onboarding, "alice@example.com", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn a_new_code_replaces_the_old_one() {
    let app = TestApp::new().await;
    app.services.users.register("alice@example.com").await.unwrap();
    let first = app.mailer.last_code_for("alice@example.com").unwrap();
    app.services.users.register("alice@example.com").await.unwrap();
    let second = app.mailer.last_code_for("alice@example.com").unwrap();

    if first != second {
        assert!(app
            .services
            .users
            .verify(VerificationKind::Onboarding, "alice@example.com", &first)
            .await
            .is_err());
    }
    assert!(app
        .services
        .users
        .verify(VerificationKind::Onboarding, "alice@example.com", &second)
        .await
        .is_ok());
}

#[tokio::test]
async fn onboarding_rejects_bad_input() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;

    app.services.users.register("bob@example.com").await.unwrap();
    let code = app.mailer.last_code_for("bob@example.com").unwrap();
    let ticket = app
        .services
        .users
        .verify(VerificationKind::Onboarding, "bob@example.com", &code)
        .await
        .unwrap();

    let input = |username: &str, password: &str, confirm: &str| OnboardingInput {
        ticket: ticket.clone(),
        username: username.to_string(),
        name: Some("Bob".to_string()),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
        remember_me: false,
    };

    let err = app
        .services
        .users
        .complete_onboarding(input("bob", PASSWORD, "something-else"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = app
        .services
        .users
        .complete_onboarding(input("bob", "short", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = app
        .services
        .users
        .complete_onboarding(input("alice", PASSWORD, PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = app
        .services
        .users
        .complete_onboarding(OnboardingInput {
            ticket: "not-a-ticket".to_string(),
            ..input("bob", PASSWORD, PASSWORD)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));

    let bob = app
        .services
        .users
        .complete_onboarding(input("bob", PASSWORD, PASSWORD))
        .await
        .unwrap();
    assert_eq!(bob.user.name.as_deref(), Some("Bob"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;

    for login in ["alice", "nobody"] {
        let err = app
            .services
            .users
            .login(login, "wrong-password", false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn password_reset_flow() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;
    app.mailer.clear();

    // Unknown accounts look the same to the caller but get no mail.
    app.services.users.forgot_password("ghost").await.unwrap();
    assert!(app.mailer.messages().is_empty());

    app.services.users.forgot_password("alice").await.unwrap();
    let code = app.mailer.last_code_for("alice@example.com").unwrap();

    // A reset code cannot finish an onboarding.
    assert!(app
        .services
        .users
        .verify(VerificationKind::Onboarding, "alice@example.com", &code)
        .await
        .is_err());

    let ticket = app
        .services
        .users
        .verify(VerificationKind::ResetPassword, "alice@example.com", &code)
        .await
        .unwrap();

    app.services
        .users
        .reset_password(&ticket, "new-password-1", "new-password-1")
        .await
        .unwrap();

    assert!(app.services.users.login("alice", PASSWORD, false).await.is_err());
    assert!(app
        .services
        .users
        .login("alice", "new-password-1", false)
        .await
        .is_ok());
}

#[tokio::test]
async fn onboarding_ticket_cannot_reset_a_password() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;

    app.services.users.register("bob@example.com").await.unwrap();
    let code = app.mailer.last_code_for("bob@example.com").unwrap();
    let ticket = app
        .services
        .users
        .verify(VerificationKind::Onboarding, "bob@example.com", &code)
        .await
        .unwrap();

    let err = app
        .services
        .users
        .reset_password(&ticket, "new-password-1", "new-password-1")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));
}

#[tokio::test]
async fn change_password_requires_current_one() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;

    let err = app
        .services
        .users
        .change_password(&alice.user.id, "wrong-password", "new-password-1")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));

    app.services
        .users
        .change_password(&alice.user.id, PASSWORD, "new-password-1")
        .await
        .unwrap();
    assert!(app
        .services
        .users
        .login("alice@example.com", "new-password-1", false)
        .await
        .is_ok());
}

#[tokio::test]
async fn default_admin_only_on_empty_database() {
    let app = TestApp::new().await;
    assert!(app
        .services
        .users
        .ensure_default_admin("admin", "admin@shop.test", PASSWORD)
        .await
        .unwrap());
    assert!(!app
        .services
        .users
        .ensure_default_admin("admin2", "admin2@shop.test", PASSWORD)
        .await
        .unwrap());

    let admin = app.services.users.login("admin", PASSWORD, false).await.unwrap();
    assert!(admin.user.is_admin());
}

#[tokio::test]
async fn profiles_and_feedback() {
    let app = TestApp::new().await;
    app.sign_up("alice@example.com", "alice").await;

    let profile = app.services.users.profile("alice").await.unwrap();
    assert_eq!(profile.username, "alice");
    assert!(matches!(
        app.services.users.profile("ghost").await.unwrap_err(),
        DomainError::NotFound { .. }
    ));

    app.services
        .feedback
        .submit("Alice", "alice@example.com", "More jelly please")
        .await
        .unwrap();
    let inbox = app.mailer.messages_to("owner@shop.test");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].reply_to.as_deref(), Some("alice@example.com"));
    assert!(inbox[0].text.contains("More jelly please"));
}

#[tokio::test]
async fn expired_verifications_are_purged() {
    let app = TestApp::new().await;
    app.services.users.register("alice@example.com").await.unwrap();

    // Nothing is expired yet.
    assert_eq!(app.services.verification.purge_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn profile_picture_replaces_previous_one() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com", "alice").await;
    assert!(alice.user.image_id.is_none());

    let err = app.services.users.remove_image(&alice.user.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let png = |data: &[u8]| NewImage {
        content_type: "image/png".to_string(),
        data: data.to_vec(),
    };
    let first = app
        .services
        .users
        .update_image(&alice.user.id, png(b"first"))
        .await
        .unwrap();
    let second = app
        .services
        .users
        .update_image(&alice.user.id, png(b"second"))
        .await
        .unwrap();
    assert!(first.image_id.is_some());
    assert_ne!(first.image_id, second.image_id);

    let image = app.services.users.profile_image("alice").await.unwrap();
    assert_eq!(image.data, b"second".to_vec());
    assert_eq!(image.user_id, alice.user.id);

    let err = app
        .services
        .users
        .update_image(&alice.user.id, png(b""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    app.services.users.remove_image(&alice.user.id).await.unwrap();
    assert!(app.services.users.me(&alice.user.id).await.unwrap().image_id.is_none());
    assert!(matches!(
        app.services.users.profile_image("alice").await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}
