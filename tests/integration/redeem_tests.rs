use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tg_promo::api::{ApiCall, ApiCallLog, RedeemClient, RedeemFlash, RedeemResult};
use tg_promo::localization::Lang;
use tg_promo::storage::{MemoryStorage, Storage, API_CALLS_KEY, REDEEM_RESULT_KEY};

use super::test_utils::{unreachable_endpoint, TestServer};

fn client_for(server: &TestServer, session: Arc<MemoryStorage>) -> RedeemClient {
    RedeemClient::new(server.url.clone(), session).unwrap()
}

#[tokio::test]
async fn test_legacy_ok_result_is_decoded() {
    let server = TestServer::start(200, r#"{"result":"OK {granted:[77,73]}"}"#).await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    let result = client.redeem("123456", Lang::Es).await;

    assert_eq!(
        result,
        RedeemResult::Ok {
            granted: vec!["77".to_string(), "73".to_string()]
        }
    );
}

#[tokio::test]
async fn test_legacy_not_ok_result_is_decoded() {
    let server = TestServer::start(200, r#"{"result":"NOT_OK {reason: ALREADY_OWN_77}"}"#).await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    let result = client.redeem("123456", Lang::En).await;

    assert_eq!(
        result,
        RedeemResult::NotOk {
            reason: "ALREADY_OWN_77".to_string()
        }
    );
}

#[tokio::test]
async fn test_structured_results_are_decoded() {
    let server = TestServer::start(200, r#"{"granted":["77",73]}"#).await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    assert_eq!(
        client.redeem("1", Lang::En).await,
        RedeemResult::Ok {
            granted: vec!["77".to_string(), "73".to_string()]
        }
    );

    let server = TestServer::start(200, r#"{"reason":"MISSING_PARAMS"}"#).await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    assert_eq!(
        client.redeem("1", Lang::En).await,
        RedeemResult::NotOk {
            reason: "MISSING_PARAMS".to_string()
        }
    );
}

#[tokio::test]
async fn test_request_body_carries_id_lang_and_click_time() {
    let server = TestServer::start(200, r#"{"granted":[]}"#).await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    let clicked_at = Utc.with_ymd_and_hms(2025, 11, 10, 12, 30, 5).unwrap();

    let result = client.redeem_at("987", Lang::Pt, clicked_at).await;

    assert_eq!(result, RedeemResult::Ok { granted: vec![] });
    assert_eq!(
        server.requests(),
        vec![json!({
            "tg_id": "987",
            "lang": "pt",
            "clicked_at": "2025-11-10T12:30:05.000Z"
        })]
    );
}

#[tokio::test]
async fn test_non_2xx_is_error() {
    for status in [400, 404, 500, 503] {
        let server = TestServer::start(status, r#"{"granted":[77]}"#).await;
        let client = client_for(&server, Arc::new(MemoryStorage::new()));

        assert_eq!(client.redeem("1", Lang::En).await, RedeemResult::Error);
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_error() {
    let bodies = [
        "not json",
        "[]",
        r#"{}"#,
        r#"{"result":"OK {granted:[77,73}"}"#,
        r#"{"result":"OK {granted:[77,,73]}"}"#,
        r#"{"result":"OK {granted:[77 73]}"}"#,
        r#"{"result":"OK {granted:[77]} trailing"}"#,
        r#"{"result":"NOT_OK {reason: }"}"#,
        r#"{"result":"NOT_OK {reason: \"ALREADY_OWN_77}"}"#,
        r#"{"result":"NOT_OK {reason: ALREADY_OWN_77\"}"}"#,
        r#"{"result":"MAYBE"}"#,
        r#"{"granted":[{"id":77}]}"#,
        r#"{"granted":"77"}"#,
        r#"{"reason":""}"#,
    ];

    for body in bodies {
        let server = TestServer::start(200, body).await;
        let client = client_for(&server, Arc::new(MemoryStorage::new()));

        assert_eq!(
            client.redeem("1", Lang::En).await,
            RedeemResult::Error,
            "body {} should be rejected",
            body
        );
    }
}

#[tokio::test]
async fn test_timeout_is_error() {
    let server =
        TestServer::start_with_delay(200, r#"{"granted":[77]}"#, Duration::from_secs(3)).await;
    let session = Arc::new(MemoryStorage::new());
    let client =
        RedeemClient::with_timeout(server.url.clone(), Duration::from_millis(200), session.clone())
            .unwrap();

    let started = std::time::Instant::now();
    let result = client.redeem("1", Lang::En).await;

    assert_eq!(result, RedeemResult::Error);
    assert!(started.elapsed() < Duration::from_secs(2));

    let calls = client.call_log().entries();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].status, 0);
}

#[tokio::test]
async fn test_connection_failure_is_error() {
    let session = Arc::new(MemoryStorage::new());
    let client = RedeemClient::new(unreachable_endpoint(), session).unwrap();

    assert_eq!(client.redeem("1", Lang::En).await, RedeemResult::Error);
    assert_eq!(client.call_log().entries().len(), 1);
}

#[tokio::test]
async fn test_every_call_is_logged() {
    let server = TestServer::start(500, "boom").await;
    let session = Arc::new(MemoryStorage::new());
    let client = client_for(&server, session.clone());

    client.redeem("42", Lang::Fr).await;
    client.redeem("42", Lang::Fr).await;

    let calls = client.call_log().entries();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].status, 500);
    assert!(!calls[0].is_success());
    assert_eq!(calls[0].endpoint, server.url.as_str());
    assert_eq!(calls[0].request["tg_id"], "42");
    assert_eq!(calls[0].response, json!("boom"));
    assert!(session.get(API_CALLS_KEY).is_some());

    client.call_log().clear();
    assert!(client.call_log().entries().is_empty());
}

#[test]
fn test_call_log_keeps_most_recent_fifty() {
    let session = Arc::new(MemoryStorage::new());
    let log = ApiCallLog::new(session);

    for i in 0..55 {
        log.record(ApiCall::new("/redeem", json!({ "n": i }), json!({}), 200));
    }

    let calls = log.entries();
    assert_eq!(calls.len(), 50);
    assert_eq!(calls[0].request["n"], 5);
    assert_eq!(calls[49].request["n"], 54);
}

#[test]
fn test_call_log_recovers_from_corrupt_storage() {
    let session = Arc::new(MemoryStorage::new());
    session.set(API_CALLS_KEY, "{corrupt").unwrap();
    let log = ApiCallLog::new(session);

    assert!(log.entries().is_empty());
    log.record(ApiCall::new("/redeem", json!({}), json!({}), 200));
    assert_eq!(log.entries().len(), 1);
}

#[test]
fn test_flash_result_is_single_use() {
    let session = Arc::new(MemoryStorage::new());
    let flash = RedeemFlash::new(session.clone());

    for result in [
        RedeemResult::Ok {
            granted: vec!["77".to_string()],
        },
        RedeemResult::NotOk {
            reason: "ALREADY_OWN_77".to_string(),
        },
        RedeemResult::Error,
    ] {
        flash.store(&result).unwrap();
        assert_eq!(flash.take(), Some(result));
        assert_eq!(flash.take(), None);
    }
    assert!(session.get(REDEEM_RESULT_KEY).is_none());
}

#[test]
fn test_flash_uses_status_tagged_json() {
    let session = Arc::new(MemoryStorage::new());
    let flash = RedeemFlash::new(session.clone());

    flash
        .store(&RedeemResult::NotOk {
            reason: "MISSING_PARAMS".to_string(),
        })
        .unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&session.get(REDEEM_RESULT_KEY).unwrap()).unwrap();
    assert_eq!(stored, json!({ "status": "NOT_OK", "reason": "MISSING_PARAMS" }));
}

#[test]
fn test_malformed_flash_is_cleared() {
    let session = Arc::new(MemoryStorage::new());
    session.set(REDEEM_RESULT_KEY, "{\"status\":\"MAYBE\"}").unwrap();
    let flash = RedeemFlash::new(session.clone());

    assert_eq!(flash.take(), None);
    assert!(session.get(REDEEM_RESULT_KEY).is_none());
}

#[test]
fn test_encoded_results_tolerate_spacing_and_quotes() {
    assert_eq!(
        RedeemResult::from_encoded("  OK { granted : [ \"77\" , 73 ] }  ").unwrap(),
        RedeemResult::Ok {
            granted: vec!["77".to_string(), "73".to_string()]
        }
    );
    assert_eq!(
        RedeemResult::from_encoded("OK {granted:[]}").unwrap(),
        RedeemResult::Ok { granted: vec![] }
    );
    assert_eq!(
        RedeemResult::from_encoded("NOT_OK {reason:\"MISSING_PARAMS\"}").unwrap(),
        RedeemResult::NotOk {
            reason: "MISSING_PARAMS".to_string()
        }
    );
}

#[test]
fn test_encoded_reason_quotes_must_balance() {
    assert_eq!(
        RedeemResult::from_encoded("NOT_OK {reason: ALREADY_OWN_77}").unwrap(),
        RedeemResult::NotOk {
            reason: "ALREADY_OWN_77".to_string()
        }
    );
    assert!(RedeemResult::from_encoded("NOT_OK {reason: \"ALREADY_OWN_77}").is_err());
    assert!(RedeemResult::from_encoded("NOT_OK {reason: ALREADY_OWN_77\"}").is_err());
}
