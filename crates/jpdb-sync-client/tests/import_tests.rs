use std::sync::atomic::{AtomicUsize, Ordering};

use jpdb_sync::test_support::InMemoryCollection;
use jpdb_sync::{ImportError, ImportPipeline, ImportRequest, ImportStage, ServiceError};
use jpdb_sync_client::{ClientConfig, JpdbClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Answers a lookup with one `[spelling, reading, meanings]` entry per
/// requested pair, using the live API's bare-string shape.
fn lookup_response(request: &Request) -> ResponseTemplate {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let info: Vec<Value> = body["list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let vid = pair[0].as_i64().unwrap();
            if vid % 10 == 0 {
                Value::Null
            } else {
                json!([format!("語{vid}"), format!("ご{vid}"), [format!("word {vid}")]])
            }
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({ "vocabulary_info": info }))
}

async fn mount_deck(server: &MockServer, count: i64) {
    let vocabulary: Vec<Value> = (1..=count).map(|i| json!([i, i + 1000])).collect();

    Mock::given(method("POST"))
        .and(path("/deck/list-vocabulary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vocabulary": vocabulary })))
        .mount(server)
        .await;
}

fn request() -> ImportRequest {
    ImportRequest {
        deck_id: 5,
        target_deck: "Mined".into(),
        note_type: "Basic".into(),
    }
}

async fn lookup_requests(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/lookup-vocabulary")
        .collect()
}

fn batch_len(request: &Request) -> usize {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body["list"].as_array().unwrap().len()
}

#[tokio::test]
async fn import_batches_lookups_and_counts_unresolved_records() {
    let server = MockServer::start().await;
    mount_deck(&server, 250).await;

    Mock::given(method("POST"))
        .and(path("/lookup-vocabulary"))
        .respond_with(lookup_response)
        .mount(&server)
        .await;

    let client = JpdbClient::new(ClientConfig::new("key").with_api_base(server.uri())).unwrap();
    let collection = InMemoryCollection::new();

    let report = ImportPipeline::new(&client, &collection)
        .run_import(&request())
        .await
        .unwrap();

    // Every tenth vocabulary id resolves to null.
    assert_eq!(report.imported, 225);
    assert_eq!(report.skipped, 25);

    let sizes: Vec<usize> = lookup_requests(&server).await.iter().map(batch_len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let notes = collection.notes();
    assert_eq!(notes[0].fields, vec!["語1 (ご1)", "word 1"]);
    assert!(notes.iter().all(|n| n.deck == "Mined"));
}

#[tokio::test]
async fn failing_second_lookup_stops_the_import() {
    let server = MockServer::start().await;
    mount_deck(&server, 250).await;

    let calls = AtomicUsize::new(0);
    Mock::given(method("POST"))
        .and(path("/lookup-vocabulary"))
        .respond_with(move |request: &Request| {
            if calls.fetch_add(1, Ordering::SeqCst) == 1 {
                ResponseTemplate::new(429).set_body_string("slow down")
            } else {
                lookup_response(request)
            }
        })
        .mount(&server)
        .await;

    let client = JpdbClient::new(ClientConfig::new("key").with_api_base(server.uri())).unwrap();
    let collection = InMemoryCollection::new();

    let aborted = ImportPipeline::new(&client, &collection)
        .run_import(&request())
        .await
        .unwrap_err();

    assert_eq!(aborted.stage, ImportStage::Resolving);
    assert_eq!(aborted.report.imported, 90);
    assert_eq!(aborted.report.skipped, 10);
    assert!(matches!(
        aborted.error,
        ImportError::Service(ServiceError::Remote { status: 429, .. })
    ));
    assert_eq!(lookup_requests(&server).await.len(), 2);
    assert_eq!(collection.notes().len(), 90);
}
