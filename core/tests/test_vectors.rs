//! Verify request building, status mapping, and envelope extraction against
//! JSON vectors stored in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field order does
//! not matter.

use std::collections::BTreeMap;

use serde_json::Value;
use snapads_core::envelope::{extract_list, extract_single};
use snapads_core::{
    decode_response, Ad, ApiError, Envelope, HttpMethod, HttpResponse, HttpStatusError,
    SnapchatClient,
};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn status_error_name(error: HttpStatusError) -> &'static str {
    match error {
        HttpStatusError::BadRequest => "BadRequest",
        HttpStatusError::Unauthorized => "Unauthorized",
        HttpStatusError::PaymentRequired => "PaymentRequired",
        HttpStatusError::Forbidden => "Forbidden",
        HttpStatusError::NotFound => "NotFound",
        HttpStatusError::MethodNotAllowed => "MethodNotAllowed",
        HttpStatusError::NotAcceptable => "NotAcceptable",
        HttpStatusError::Gone => "Gone",
        HttpStatusError::TooManyRequests => "TooManyRequests",
        HttpStatusError::InternalServerError => "InternalServerError",
        HttpStatusError::ServiceUnavailable => "ServiceUnavailable",
        HttpStatusError::Other(_) => "Other",
    }
}

fn envelope_error_name(error: &ApiError) -> &'static str {
    match error {
        ApiError::NonSuccessStatus { .. } => "NonSuccessStatus",
        ApiError::NotFound { .. } => "NotFound",
        ApiError::EmptyResult { .. } => "EmptyResult",
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Compare an extraction result with `{"ids": [...]}` or `{"error": "..."}`.
fn check_outcome(name: &str, op: &str, result: Result<Vec<Ad>, ApiError>, expected: &Value) {
    match (result, expected.get("error")) {
        (Ok(ads), None) => {
            let ids: Vec<&str> = ads.iter().map(|ad| ad.id.as_str()).collect();
            let want: Vec<&str> = expected["ids"]
                .as_array()
                .unwrap()
                .iter()
                .map(|id| id.as_str().unwrap())
                .collect();
            assert_eq!(ids, want, "{name}: {op} ids");
        }
        (Err(err), Some(kind)) => {
            assert_eq!(envelope_error_name(&err), kind.as_str().unwrap(), "{name}: {op} error");
        }
        (got, _) => panic!("{name}: {op} expected {expected}, got {got:?}"),
    }
}

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

#[test]
fn status_code_vectors() {
    let raw = include_str!("../../test-vectors/status_codes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let status = case["status"].as_u64().unwrap() as u16;
        let response = HttpResponse::new(status, r#"{"request_status":"SUCCESS"}"#);
        let result = decode_response::<Value>(response);

        match case["error"].as_str() {
            None => assert!(result.is_ok(), "{status}: expected success"),
            Some(kind) => {
                let error = result
                    .unwrap_err()
                    .status_error()
                    .unwrap_or_else(|| panic!("{status}: expected a status error"));
                assert_eq!(status_error_name(error), kind, "{status}");
                assert_eq!(error.status(), status, "{status}: code preserved");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn envelope_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let envelope: Envelope<Ad> = serde_json::from_value(case["body"].clone()).unwrap();

        let list = extract_list(envelope.clone(), "list ads");
        check_outcome(name, "list", list, &case["list"]);

        let single = extract_single(envelope, "get ad").map(|ad| vec![ad]);
        check_outcome(name, "single", single, &case["single"]);
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config = &case["config"];

        let mut builder = SnapchatClient::builder();
        if let Some(token) = config["access_token"].as_str() {
            builder = builder.access_token(token);
        }
        if let Some(host) = config["host"].as_str() {
            builder = builder.host(host);
        }
        if let Some(version) = config["version"].as_str() {
            builder = builder.version(version);
        }
        if let Some(headers) = config["headers"].as_object() {
            builder = builder.headers(
                headers
                    .iter()
                    .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string())),
            );
        }
        let client = builder.build().unwrap();

        let method = parse_method(case["method"].as_str().unwrap());
        let path = case["path"].as_str().unwrap();
        let req = if case["body"].is_null() {
            client.build_request(method, path).unwrap()
        } else {
            client.build_json_request(method, path, &case["body"]).unwrap()
        };

        let expected = &case["expected"];
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");

        let expected_headers: BTreeMap<String, String> = expected["headers"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let body = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected["body"], "{name}: body");
    }
}
