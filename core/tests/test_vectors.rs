//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each request vector names an operation, its params, an optional body and
//! the session token, plus the exact request the dispatcher must build.
//! Response vectors pair a raw response with the expected `CallResult` or
//! error kind. Bodies are compared as parsed JSON, not raw strings, so field
//! ordering never causes false negatives.

use proposalpage_core::{
    parse_response, CallError, CallErrorKind, Dispatcher, HttpMethod, HttpResponse, Params,
    Registry, RequestBody, SessionState,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> CallErrorKind {
    match s {
        "UnknownOperation" => CallErrorKind::UnknownOperation,
        "MissingPathParameter" => CallErrorKind::MissingPathParameter,
        "TransportFailure" => CallErrorKind::TransportFailure,
        "MalformedJsonResponse" => CallErrorKind::MalformedJsonResponse,
        "Serialization" => CallErrorKind::Serialization,
        other => panic!("unknown error kind: {other}"),
    }
}

fn params(value: &Value) -> Params {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
        .collect()
}

fn dispatcher() -> Dispatcher<()> {
    Dispatcher::new(Registry::standard(), ())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    let d = dispatcher();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let session = SessionState {
            base_url: base_url.to_string(),
            token: case["token"].as_str().map(str::to_string),
        };
        let body = match &case["body"] {
            Value::Null => None,
            other => Some(RequestBody::from(other.clone())),
        };
        let expected = &case["expected_request"];

        let req = d
            .build_request(
                &session,
                case["operation"].as_str().unwrap(),
                &params(&case["params"]),
                body,
                &[],
            )
            .unwrap();

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: Value = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(req_body, expected["body"], "{name}: body");
    }
}

#[test]
fn request_error_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let session = SessionState {
        base_url: vectors["base_url"].as_str().unwrap().to_string(),
        token: None,
    };

    let d = dispatcher();
    for case in vectors["errors"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = d
            .build_request(
                &session,
                case["operation"].as_str().unwrap(),
                &params(&case["params"]),
                None,
                &[],
            )
            .unwrap_err();
        assert_eq!(err.kind(), parse_kind(case["expected_kind"].as_str().unwrap()), "{name}: kind");

        if let Some(expected) = case["expected_placeholder"].as_str() {
            match err {
                CallError::MissingPathParameter { placeholder, .. } => {
                    assert_eq!(placeholder, expected, "{name}: placeholder");
                }
                other => panic!("{name}: unexpected error {other}"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        match expected["error"].as_str() {
            Some(kind) => {
                let err = parse_response(response).unwrap_err();
                assert_eq!(err.kind(), parse_kind(kind), "{name}: error kind");
            }
            None => {
                let result = parse_response(response).unwrap();
                assert_eq!(
                    result.status_code as u64,
                    expected["status_code"].as_u64().unwrap(),
                    "{name}: status"
                );
                let json = result.json.unwrap_or(Value::Null);
                assert_eq!(json, expected["json"], "{name}: json");
            }
        }
    }
}
