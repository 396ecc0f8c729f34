use jobboard::{ClientError, SkillImport};
use jobboard_common::models::SkillCategory;

use crate::common::TestBoard;

const CATALOGUE: &str = r#"[
    {"name": "Java", "category": "programming_language"},
    {"name": "JavaScript", "category": "programming_language"},
    {"name": "Python", "category": "programming_language"},
    {"name": "Jakarta EE", "category": "framework"},
    {"name": "CI/CD", "category": "tool"}
]"#;

async fn seeded() -> TestBoard {
    let app = TestBoard::spawn().await;
    let summary = app.board.documents.import_skills(CATALOGUE).await.unwrap();
    assert_eq!(summary, SkillImport { added: 5, skipped: 0 });
    app
}

#[tokio::test]
async fn prefix_search_is_scoped_to_the_category() {
    let app = seeded().await;

    let found = app
        .board
        .documents
        .search_skills("Ja", SkillCategory::ProgrammingLanguage)
        .await;

    assert_eq!(found, vec!["Java", "JavaScript"]);
}

#[tokio::test]
async fn search_is_case_sensitive_and_may_be_empty() {
    let app = seeded().await;

    let found = app
        .board
        .documents
        .search_skills("ja", SkillCategory::ProgrammingLanguage)
        .await;

    assert!(found.is_empty());
}

#[tokio::test]
async fn listing_returns_the_whole_category() {
    let app = seeded().await;

    assert_eq!(
        app.board.documents.list_skills(SkillCategory::Tool).await,
        vec!["CI/CD"]
    );
    assert!(
        app.board
            .documents
            .list_skills(SkillCategory::Certification)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn reimport_skips_existing_skills() {
    let app = seeded().await;

    let summary = app
        .board
        .documents
        .import_skills(r#"[{"name": "Java", "category": "programming_language"},
                           {"name": "Rust", "category": "programming_language"}]"#)
        .await
        .unwrap();

    assert_eq!(summary, SkillImport { added: 1, skipped: 1 });
    assert_eq!(app.count(&app.collections().skills).await, 6);
}

#[tokio::test]
async fn malformed_catalogue_writes_nothing() {
    let app = TestBoard::spawn().await;

    let result = app
        .board
        .documents
        .import_skills(r#"[{"name": "Rust", "category": "programming_language"}, {"name": "Go"}]"#)
        .await;

    assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    assert_eq!(app.count(&app.collections().skills).await, 0);
}

#[tokio::test]
async fn search_failure_yields_no_suggestions() {
    let app = seeded().await;
    app.docs.fail_queries();

    let found = app
        .board
        .documents
        .search_skills("Ja", SkillCategory::ProgrammingLanguage)
        .await;

    assert!(found.is_empty());
}
