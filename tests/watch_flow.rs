//! End-to-end workflow tests against HTTP doubles for the case-status page
//! and the Twilio API, with a scratch SQLite store.

use casewatch::config::TwilioConfig;
use casewatch::error::WatchError;
use casewatch::fetch::StatusFetcher;
use casewatch::notify::TwilioNotifier;
use casewatch::store::StatusStore;
use casewatch::watch::{run_once, Outcome};

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECEIPT: &str = "ABC1234567890";
const RECIPIENT: &str = "+15551230000";

fn temp_store() -> (tempfile::TempDir, StatusStore) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("casewatch.db");
    let store = StatusStore::open(db_path.to_str().unwrap()).unwrap();
    (dir, store)
}

fn twilio_notifier(server: &MockServer) -> TwilioNotifier {
    TwilioNotifier::new(&TwilioConfig {
        account_sid: "ACtest".to_string(),
        auth_token: "secret".to_string(),
        from_number: "+15559870000".to_string(),
        api_base: server.uri(),
    })
}

const TWILIO_MESSAGES_PATH: &str = "/2010-04-01/Accounts/ACtest/Messages.json";

/// Mount a case-status page double replying with the given HTML body.
async fn mount_status_page(server: &MockServer, html: &str) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("initCaseSearch=CHECK+STATUS"))
        .and(body_string_contains(RECEIPT))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unchanged_status_is_no_update() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><h1>Case Was Received</h1></html>").await;

    // Provider must not be called at all
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();
    store
        .set_last_known_status(RECEIPT, "Case Was Received")
        .unwrap();
    let (_, seeded_at) = store.record(RECEIPT).unwrap();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let outcome = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NoUpdate);

    // Store untouched
    let (status, updated_at) = store.record(RECEIPT).unwrap();
    assert_eq!(status, "Case Was Received");
    assert_eq!(updated_at, seeded_at);
}

#[tokio::test]
async fn test_changed_status_sends_and_persists() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><h1>Case Was Approved</h1></html>").await;

    Mock::given(method("POST"))
        .and(path(TWILIO_MESSAGES_PATH))
        .and(body_string_contains("Case+Was+Approved"))
        .and(body_string_contains("To=%2B15551230000"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM0001" })),
        )
        .expect(1)
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();
    store
        .set_last_known_status(RECEIPT, "Case Was Received")
        .unwrap();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let outcome = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::SentUpdate);
    assert_eq!(
        store.get_last_known_status(RECEIPT).unwrap(),
        "Case Was Approved"
    );
}

#[tokio::test]
async fn test_second_run_after_update_is_no_update() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><h1>Case Was Approved</h1></html>").await;

    // Exactly one send across both runs
    Mock::given(method("POST"))
        .and(path(TWILIO_MESSAGES_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM0002" })),
        )
        .expect(1)
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();
    store
        .set_last_known_status(RECEIPT, "Case Was Received")
        .unwrap();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let first = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap();
    let second = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap();

    assert_eq!(first, Outcome::SentUpdate);
    assert_eq!(second, Outcome::NoUpdate);
}

#[tokio::test]
async fn test_rejected_send_leaves_store_unchanged() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><h1>Case Was Approved</h1></html>").await;

    Mock::given(method("POST"))
        .and(path(TWILIO_MESSAGES_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"code": 21211, "message": "Invalid 'To' Phone Number"}"#),
        )
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();
    store
        .set_last_known_status(RECEIPT, "Case Was Received")
        .unwrap();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let err = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap_err();

    match err {
        WatchError::Delivery { status, detail } => {
            assert_eq!(status, 400);
            assert!(detail.contains("Invalid 'To' Phone Number"));
        }
        other => panic!("expected Delivery error, got {:?}", other),
    }

    // Stale status stays so the next run re-detects the change
    assert_eq!(
        store.get_last_known_status(RECEIPT).unwrap(),
        "Case Was Received"
    );
}

#[tokio::test]
async fn test_missing_heading_is_status_not_found() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><p>Validation Error(s)</p></html>").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();
    store
        .set_last_known_status(RECEIPT, "Case Was Received")
        .unwrap();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let err = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap_err();
    assert!(matches!(err, WatchError::StatusNotFound));

    // No store mutation
    assert_eq!(
        store.get_last_known_status(RECEIPT).unwrap(),
        "Case Was Received"
    );
}

#[tokio::test]
async fn test_unseeded_receipt_is_record_not_found() {
    let page = MockServer::start().await;
    let twilio = MockServer::start().await;
    mount_status_page(&page, "<html><h1>Case Was Received</h1></html>").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&twilio)
        .await;

    let (_dir, store) = temp_store();

    let fetcher = StatusFetcher::new(&page.uri());
    let notifier = twilio_notifier(&twilio);

    let err = run_once(&fetcher, &store, &notifier, RECEIPT, RECIPIENT)
        .await
        .unwrap_err();
    match err {
        WatchError::RecordNotFound(receipt) => assert_eq!(receipt, RECEIPT),
        other => panic!("expected RecordNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_error_status_is_transport() {
    let page = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&page)
        .await;

    let fetcher = StatusFetcher::new(&page.uri());
    let err = fetcher.fetch_current_status(RECEIPT).await.unwrap_err();
    assert!(matches!(err, WatchError::Transport(_)));
}
