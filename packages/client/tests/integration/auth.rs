use jobboard::ReturnType;
use jobboard_common::identity::{FederatedCredential, IdentityProvider};
use jobboard_common::models::AccountDocument;

use crate::common::{PASSWORD, TestBoard, firm_registration, user_registration};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_gets_a_profile_and_is_signed_in() {
        let app = TestBoard::spawn().await;

        let result = app
            .board
            .identity
            .register_user(&user_registration("ana@example.com"))
            .await;

        assert_eq!(result, ReturnType::Success);
        let user = app.board.identity.current_user().expect("signed in");
        assert_eq!(user.email, "ana@example.com");
        assert!(app.local_storage.is_logged_in().await);

        match app.board.documents.get_document_by_uid(&user.uid).await {
            Some(AccountDocument::User(account)) => {
                assert_eq!(account.name, "Ana Popescu");
                assert_eq!(account.telephone, "0712345678");
                assert!(!account.is_firm);
            }
            other => panic!("expected a user profile, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_firm_gets_a_firm_profile() {
        let app = TestBoard::spawn().await;

        let uid = app.register_firm("hr@acme.example", "Acme Software").await;

        match app.board.documents.get_document_by_uid(&uid).await {
            Some(AccountDocument::Firm(firm)) => {
                assert_eq!(firm.company_name, "Acme Software");
                assert_eq!(firm.tax_id, "12345678");
                assert!(firm.is_firm);
            }
            other => panic!("expected a firm profile, got {other:?}"),
        }
        assert_eq!(app.count(&app.collections().users).await, 0);
    }

    #[tokio::test]
    async fn cannot_register_an_email_twice() {
        let app = TestBoard::spawn().await;
        app.register_user("ana@example.com").await;

        let again = app
            .board
            .identity
            .register_firm(&firm_registration("ana@example.com", "Acme Software"))
            .await;

        assert_eq!(again, ReturnType::EmailInUse);
        assert_eq!(app.count(&app.collections().users).await, 1);
        assert_eq!(app.count(&app.collections().firms).await, 0);
    }

    #[tokio::test]
    async fn provider_rejects_a_short_password() {
        let app = TestBoard::spawn().await;
        let mut form = user_registration("ana@example.com");
        form.password = "abc".into();

        let result = app.board.identity.register_user(&form).await;

        assert_eq!(result, ReturnType::WeakPassword);
        assert!(app.board.identity.current_user().is_none());
    }

    #[tokio::test]
    async fn failed_profile_write_rolls_back_the_identity() {
        let app = TestBoard::spawn().await;
        app.docs.fail_sets_in(&app.collections().users);

        let result = app
            .board
            .identity
            .register_user(&user_registration("ana@example.com"))
            .await;

        assert_eq!(result, ReturnType::RegistrationFailed);
        assert!(app.board.identity.current_user().is_none());
        assert!(!app.local_storage.is_logged_in().await);

        // The identity is gone, so the email can be registered again.
        app.docs.heal();
        let retry = app
            .board
            .identity
            .register_user(&user_registration("ana@example.com"))
            .await;
        assert_eq!(retry, ReturnType::Success);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_sign_back_in() {
        let app = TestBoard::spawn().await;
        let uid = app.register_user("ana@example.com").await;
        app.board.identity.logout().await;

        let result = app
            .board
            .identity
            .login_with_email("ana@example.com", PASSWORD)
            .await;

        assert_eq!(result, ReturnType::Success);
        assert_eq!(app.board.session().uid().as_deref(), Some(uid.as_str()));
        assert!(app.local_storage.is_logged_in().await);
    }

    #[tokio::test]
    async fn bad_credentials_are_reported_as_invalid() {
        let app = TestBoard::spawn().await;
        app.register_user("ana@example.com").await;
        app.board.identity.logout().await;

        for (email, password) in [
            ("ana@example.com", "wrong-password"),
            ("nobody@example.com", PASSWORD),
            ("not-an-email", PASSWORD),
        ] {
            let result = app.board.identity.login_with_email(email, password).await;
            assert_eq!(result, ReturnType::InvalidCredentials, "{email}");
        }
        assert!(app.board.identity.current_user().is_none());
    }

    #[tokio::test]
    async fn logout_clears_session_and_flag() {
        let app = TestBoard::spawn().await;
        app.register_user("ana@example.com").await;
        let mut session = app.board.session();
        assert!(session.is_authenticated());

        app.board.identity.logout().await;

        assert_eq!(session.changed().await, None);
        assert!(!session.is_authenticated());
        assert!(!app.local_storage.is_logged_in().await);
    }

    #[tokio::test]
    async fn id_token_identifies_the_current_user() {
        let app = TestBoard::spawn().await;
        let uid = app.register_user("ana@example.com").await;

        let token = app.board.identity.id_token(true).await.unwrap();

        let claims = app.identity.verify_token(&token).unwrap();
        assert_eq!(claims.sub, uid);
        assert_eq!(claims.email, "ana@example.com");
    }
}

mod federated {
    use super::*;

    fn google(subject: &str) -> FederatedCredential {
        FederatedCredential {
            provider_id: "google.com".into(),
            subject: subject.into(),
            email: "maria@gmail.com".into(),
            display_name: Some("Maria Ionescu".into()),
            photo_url: Some("https://example.com/maria.png".into()),
        }
    }

    #[tokio::test]
    async fn first_sign_in_creates_a_profile_once() {
        let app = TestBoard::spawn().await;

        let result = app.board.identity.login_with_federated(&google("g-123")).await;
        assert_eq!(result, ReturnType::Success);
        assert!(app.local_storage.is_logged_in().await);

        let user = app.board.identity.current_user().expect("signed in");
        let account = app.board.documents.ensure_user_document(&user).await.unwrap();
        assert_eq!(account.display_name(), "Maria Ionescu");
        assert_eq!(account.profile_pic(), "https://example.com/maria.png");

        let again = app.board.documents.ensure_user_document(&user).await.unwrap();
        assert_eq!(again, account);
        assert_eq!(app.count(&app.collections().users).await, 1);
    }

    #[tokio::test]
    async fn same_subject_maps_to_the_same_account() {
        let app = TestBoard::spawn().await;

        app.board.identity.login_with_federated(&google("g-123")).await;
        let first = app.identity.current_user().expect("signed in").uid;
        app.board.identity.logout().await;
        app.board.identity.login_with_federated(&google("g-123")).await;

        assert_eq!(app.identity.current_user().expect("signed in").uid, first);
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected() {
        let app = TestBoard::spawn().await;
        let credential = FederatedCredential {
            provider_id: "example.org".into(),
            ..google("x-1")
        };

        let result = app.board.identity.login_with_federated(&credential).await;

        assert_eq!(result, ReturnType::FederatedLoginFailed);
        assert!(!app.local_storage.is_logged_in().await);
    }
}
