use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDateTime;
use garbage_sorter::adapters::fs::json_record_store::JsonFileRecordStore;
use garbage_sorter::adapters::http::{routes, state::StorageState, storage_router};
use garbage_sorter::application::services::StorageService;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn app() -> (Router, PathBuf, TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = Arc::new(JsonFileRecordStore::open(&path).await.unwrap());
    let storage = Arc::new(StorageService::new(store));
    (storage_router(StorageState { storage }), path, dir)
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn save_req(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/save")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn stored(path: &Path) -> Vec<Value> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let (app, _, _dir) = app().await;
    let (status, body) = call(&app, get_req("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": routes::RUNNING_MESSAGE}));
}

#[tokio::test]
async fn unclassified_is_acknowledged_but_not_stored() {
    let (app, path, _dir) = app().await;
    let input = json!({"class_id": -1, "confidence": 0.12, "bbox": [1.0, 2.0, 3.0, 4.0]});

    let (status, body) = call(&app, save_req(&input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], routes::UNCLASSIFIED_MESSAGE);
    assert_eq!(body["data"], input);
    assert!(stored(&path).is_empty());
}

#[tokio::test]
async fn unclassified_echo_is_byte_for_byte() {
    let (app, path, _dir) = app().await;
    let raw = r#"{"class_id":-1,"confidence":null,"bbox":[1,2,3,4],"note":"未分類"}"#;
    let req = Request::builder()
        .method("POST")
        .uri("/save")
        .header("content-type", "application/json")
        .body(Body::from(raw))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = String::from_utf8(to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();

    assert!(text.contains(&format!("\"data\":{raw}")), "{text}");
    assert!(stored(&path).is_empty());
}

#[tokio::test]
async fn save_assigns_next_id_and_timestamp() {
    let (app, path, _dir) = app().await;
    call(&app, save_req(&json!({"class_id": 0, "confidence": 0.9}))).await;
    let before = stored(&path).len();

    let input = json!({"class_id": 2, "confidence": 0.876, "bbox": [10.5, 20.25, 30.0, 40.75]});
    let (status, body) = call(&app, save_req(&input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], routes::SAVED_MESSAGE);
    let data = &body["data"];
    assert_eq!(data["id"], json!(before + 1));
    assert_eq!(data["class_id"], 2);
    assert_eq!(data["bbox"], input["bbox"]);
    let ts = data["detected_at"].as_str().unwrap();
    assert!(NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    let frac = ts.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
    assert!(frac <= 6, "{ts}");

    let records = stored(&path);
    assert_eq!(records.len(), before + 1);
    assert_eq!(&records[before], data);
}

#[tokio::test]
async fn identical_saves_are_not_deduplicated() {
    let (app, path, _dir) = app().await;
    let input = json!({"class_id": 1, "confidence": 0.5});

    let (_, first) = call(&app, save_req(&input)).await;
    let (_, second) = call(&app, save_req(&input)).await;

    assert_ne!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(stored(&path).len(), 2);
}

#[tokio::test]
async fn client_supplied_id_is_ignored() {
    let (app, _, _dir) = app().await;
    let (_, body) = call(&app, save_req(&json!({"class_id": 0, "id": 42, "note": "手動"}))).await;
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["note"], "手動");
}

#[tokio::test]
async fn missing_class_id_is_rejected_at_the_boundary() {
    let (app, path, _dir) = app().await;

    let (status, body) = call(&app, save_req(&json!({"confidence": 0.9}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, save_req(&json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(stored(&path).is_empty());
}

#[tokio::test]
async fn percent_on_empty_collection_is_zero() {
    let (app, _, _dir) = app().await;
    let (status, body) = call(&app, get_req("/GetGarbagePercent")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "0": {"itemName": "段ボール", "percent": 0.0},
            "1": {"itemName": "アルミ缶", "percent": 0.0},
            "2": {"itemName": "ペットボトル", "percent": 0.0},
            "total": 0
        })
    );
}

#[tokio::test]
async fn percent_counts_only_known_categories() {
    let (app, path, _dir) = app().await;
    for class_id in [0, 0, 1] {
        call(&app, save_req(&json!({"class_id": class_id}))).await;
    }
    // Registro con un id desconocido escrito por otra herramienta.
    let mut records = stored(&path);
    records.push(json!({"class_id": 5, "detected_at": "2025-01-01T00:00:00", "id": 4}));
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let (_, body) = call(&app, get_req("/GetGarbagePercent")).await;

    assert_eq!(body["0"]["percent"], 66.7);
    assert_eq!(body["1"]["percent"], 33.3);
    assert_eq!(body["2"]["percent"], 0.0);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn percent_skips_records_with_malformed_class_id() {
    let (app, path, _dir) = app().await;
    let records = json!([
        {"class_id": 0, "detected_at": "2025-01-01T00:00:00", "id": 1},
        {"class_id": null, "detected_at": "2025-01-01T00:00:01", "id": 2},
        {"class_id": "2", "id": 3},
        {"confidence": 0.4, "id": 4}
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let (status, body) = call(&app, get_req("/GetGarbagePercent")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["0"]["percent"], 100.0);
    assert_eq!(body["2"]["percent"], 0.0);

    // Guardar sigue funcionando y no toca los registros ajenos.
    let (status, saved) = call(&app, save_req(&json!({"class_id": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"]["id"], 5);
    assert_eq!(stored(&path)[1], records[1]);
}

#[tokio::test]
async fn corrupt_store_is_a_server_error() {
    let (app, path, _dir) = app().await;
    std::fs::write(&path, "no es json").unwrap();

    let (status, _) = call(&app, get_req("/GetGarbagePercent")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = call(&app, save_req(&json!({"class_id": 0}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _, _dir) = app().await;
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/save")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
