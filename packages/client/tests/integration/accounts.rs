use jobboard::ReturnType;
use jobboard_common::models::{
    AccountDocument, FileUpload, FirmProfileUpdate, UserProfileUpdate,
};

use crate::common::TestBoard;

fn picture() -> FileUpload {
    FileUpload::new("me.png", vec![0x89, b'P', b'N', b'G']).with_content_type("image/png")
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn unknown_uid_has_no_document() {
        let app = TestBoard::spawn().await;
        assert!(app.board.documents.get_document_by_uid("nobody").await.is_none());
    }

    #[tokio::test]
    async fn user_profile_wins_over_a_firm_profile() {
        let app = TestBoard::spawn().await;
        let uid = app.register_firm("hr@acme.example", "Acme Software").await;
        app.board
            .documents
            .set_user_document(&uid, "hr@acme.example", "Ion Ionescu", "")
            .await
            .unwrap();

        let account = app.board.documents.get_document_by_uid(&uid).await.unwrap();

        assert!(!account.is_firm());
        assert_eq!(account.display_name(), "Ion Ionescu");
    }

    #[tokio::test]
    async fn blank_name_gets_the_default() {
        let app = TestBoard::spawn().await;
        app.board
            .documents
            .set_user_document("u1", "ana@example.com", "  ", "")
            .await
            .unwrap();

        let account = app.board.documents.get_document_by_uid("u1").await.unwrap();

        assert_eq!(account.display_name(), app.board.config().profile.default_user_name);
    }
}

mod edit {
    use super::*;

    #[tokio::test]
    async fn user_profile_update_uploads_the_picture() {
        let app = TestBoard::spawn().await;
        let uid = app.register_user("ana@example.com").await;

        let result = app
            .board
            .documents
            .edit_user_document(
                &uid,
                UserProfileUpdate {
                    email: "ana@example.com".into(),
                    telephone: "0799999999".into(),
                    name: "Ana Maria".into(),
                    profile_pic: Some(picture()),
                },
            )
            .await;

        assert_eq!(result, ReturnType::Success);
        let Some(AccountDocument::User(user)) = app.board.documents.get_document_by_uid(&uid).await
        else {
            panic!("user profile missing");
        };
        assert_eq!(user.name, "Ana Maria");
        assert_eq!(user.telephone, "0799999999");
        assert!(
            user.profile_pic
                .starts_with(&format!("memory://test-bucket/profile_pictures/{uid}_")),
            "unexpected picture url {}",
            user.profile_pic
        );
        assert!(user.profile_pic.ends_with(".png"));
    }

    #[tokio::test]
    async fn update_without_picture_keeps_the_old_one() {
        let app = TestBoard::spawn().await;
        let uid = app.register_user("ana@example.com").await;
        let before = app.board.documents.get_document_by_uid(&uid).await.unwrap();

        let result = app
            .board
            .documents
            .edit_user_document(
                &uid,
                UserProfileUpdate {
                    email: "ana@example.com".into(),
                    telephone: "0712345678".into(),
                    name: String::new(),
                    profile_pic: None,
                },
            )
            .await;

        assert_eq!(result, ReturnType::Success);
        let after = app.board.documents.get_document_by_uid(&uid).await.unwrap();
        assert_eq!(after.profile_pic(), before.profile_pic());
        assert_eq!(after.display_name(), app.board.config().profile.default_user_name);
    }

    #[tokio::test]
    async fn failed_picture_upload_leaves_the_profile_unchanged() {
        let app = TestBoard::spawn().await;
        let uid = app.register_user("ana@example.com").await;
        let before = app.board.documents.get_document_by_uid(&uid).await.unwrap();
        app.blobs.fail_puts();

        let result = app
            .board
            .documents
            .edit_user_document(
                &uid,
                UserProfileUpdate {
                    email: "new@example.com".into(),
                    telephone: "0799999999".into(),
                    name: "Someone Else".into(),
                    profile_pic: Some(picture()),
                },
            )
            .await;

        assert_eq!(result, ReturnType::UserUpdateFailed);
        assert_eq!(app.board.documents.get_document_by_uid(&uid).await.unwrap(), before);
    }

    #[tokio::test]
    async fn firm_profile_update_merges_company_fields() {
        let app = TestBoard::spawn().await;
        let uid = app.register_firm("hr@acme.example", "Acme Software").await;

        let result = app
            .board
            .documents
            .edit_firm_account(
                &uid,
                FirmProfileUpdate {
                    company_name: "Acme Cloud".into(),
                    representative_name: "Elena Dumitru".into(),
                    tax_id: "87654321".into(),
                    telephone: "0311111111".into(),
                    profile_pic: None,
                },
            )
            .await;

        assert_eq!(result, ReturnType::Success);
        let Some(AccountDocument::Firm(firm)) = app.board.documents.get_document_by_uid(&uid).await
        else {
            panic!("firm profile missing");
        };
        assert_eq!(firm.company_name, "Acme Cloud");
        assert_eq!(firm.representative_name, "Elena Dumitru");
        assert_eq!(firm.tax_id, "87654321");
        assert_eq!(firm.email, "hr@acme.example");
    }

    #[tokio::test]
    async fn store_failure_maps_to_update_failed() {
        let app = TestBoard::spawn().await;
        let uid = app.register_firm("hr@acme.example", "Acme Software").await;
        app.docs.fail_sets_in(&app.collections().firms);

        let result = app
            .board
            .documents
            .edit_firm_account(&uid, FirmProfileUpdate::default())
            .await;

        assert_eq!(result, ReturnType::UserUpdateFailed);
    }
}
