use jobboard::{JobStore, UserStore};

use crate::common::TestBoard;

#[tokio::test]
async fn user_store_follows_the_signed_in_account() {
    let app = TestBoard::spawn().await;
    let uid = app.register_firm("hr@acme.example", "Acme Software").await;
    let account = app.board.documents.get_document_by_uid(&uid).await.unwrap();

    app.board.user_store.set_user(account).await;

    let state = app.board.user_store.state();
    assert!(state.is_authenticated);
    assert!(state.is_firm);
    let restored = UserStore::load(app.local_storage.clone()).await.state();
    assert_eq!(restored, state);

    app.board.identity.logout().await;
    app.board.user_store.clear_user().await;
    let cleared = UserStore::load(app.local_storage.clone()).await.state();
    assert!(!cleared.is_authenticated);
    assert!(cleared.user_info.is_none());
}

#[tokio::test]
async fn job_store_reloads_the_firm_jobs() {
    let app = TestBoard::spawn().await;
    let firm = app.register_firm("hr@acme.example", "Acme Software").await;
    app.create_job(&firm, "First").await;
    let store = &app.board.job_store;

    store.load_jobs(&app.board.documents, &firm).await;
    assert_eq!(store.jobs().len(), 1);

    let mut updates = store.subscribe();
    app.create_job(&firm, "Second").await;
    store.add_job(&app.board.documents, &firm).await;
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().jobs.len(), 2);

    let restored = JobStore::load(app.local_storage.clone()).await;
    assert_eq!(restored.jobs(), store.jobs());

    store.clear_jobs().await;
    assert!(store.jobs().is_empty());
    assert!(JobStore::load(app.local_storage.clone()).await.jobs().is_empty());
}

#[tokio::test]
async fn failed_fetch_leaves_the_job_store_empty() {
    let app = TestBoard::spawn().await;
    let firm = app.register_firm("hr@acme.example", "Acme Software").await;
    app.create_job(&firm, "First").await;
    app.board.job_store.load_jobs(&app.board.documents, &firm).await;
    app.docs.fail_queries();

    app.board.job_store.load_jobs(&app.board.documents, &firm).await;

    assert!(app.board.job_store.jobs().is_empty());
}

#[tokio::test]
async fn filter_store_holds_the_latest_search() {
    let app = TestBoard::spawn().await;
    app.create_job("firm-1", "Backend Engineer").await;
    let page = app.board.documents.list_jobs(10, None).await;

    app.board.job_filter.set_jobs(page.jobs.clone());

    assert_eq!(app.board.job_filter.jobs(), page.jobs);
}
