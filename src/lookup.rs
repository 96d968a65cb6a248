//! Client for the profile lookup endpoint.
//!
//! The service answers a form-encoded `runType=score|speed` POST with either
//! `{"SpelunkerID", "Level", "Result"}` or `{"error": ...}`. An `error` key
//! wins over any other field.

use crate::config::{LOOKUP_ENDPOINT, LOOKUP_TIMEOUT_MS};
use crate::{LevelPosition, RunType};
use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use log::{debug, info};
use serde::{Deserialize, Deserializer};
use std::fmt;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// A best run found for the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupResult {
    #[serde(rename = "SpelunkerID", deserialize_with = "string_or_number")]
    pub spelunker_id: String,
    /// One-based linear level index.
    #[serde(rename = "Level")]
    pub level: u32,
    /// Raw score for score runs, whole milliseconds for speed runs.
    #[serde(rename = "Result")]
    pub result: u64,
}

impl LookupResult {
    /// Decoded final position. Only call on values that came through
    /// [`parse_lookup_response`], which rejects level 0.
    pub fn position(&self) -> LevelPosition {
        LevelPosition::from_level(self.level).unwrap_or(LevelPosition { world: 1, floor: 1 })
    }
}

/// Decoded payload of a lookup exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    Found(LookupResult),
    /// The service answered but refused; carries whatever the `error` key held.
    Rejected { error: serde_json::Value },
}

/// Failures below the application layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    Transport(String),
    Status(u16),
    Decode(String),
    Timeout,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Transport(msg) => write!(f, "Lookup request failed: {}", msg),
            LookupError::Status(code) => write!(f, "Lookup service answered with status {}", code),
            LookupError::Decode(msg) => write!(f, "Could not decode lookup response: {}", msg),
            LookupError::Timeout => write!(
                f,
                "Lookup service did not answer within {} ms",
                LOOKUP_TIMEOUT_MS
            ),
        }
    }
}

impl std::error::Error for LookupError {}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Form-encoded request body for a lookup of `run_type`.
pub fn encode_request_body(run_type: RunType) -> String {
    format!("runType={}", run_type.as_str())
}

/// Decode a lookup response body.
pub fn parse_lookup_response(body: &str) -> Result<LookupResponse, LookupError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| LookupError::Decode("expected a JSON object".to_string()))?;
    if let Some(error) = object.get("error") {
        return Ok(LookupResponse::Rejected {
            error: error.clone(),
        });
    }

    let result: LookupResult =
        serde_json::from_value(value).map_err(|e| LookupError::Decode(e.to_string()))?;
    if result.level == 0 {
        return Err(LookupError::Decode("Level must be at least 1".to_string()));
    }
    Ok(LookupResponse::Found(result))
}

/// Extract a readable message from a JavaScript exception value.
fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}

fn transport(err: JsValue) -> LookupError {
    LookupError::Transport(js_error_message(err, "fetch failed"))
}

async fn post_lookup(run_type: RunType) -> Result<LookupResponse, LookupError> {
    let headers = Headers::new().map_err(transport)?;
    headers
        .set("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
        .map_err(transport)?;
    headers.set("Accept", "application/json").map_err(transport)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&encode_request_body(run_type)));

    let request = Request::new_with_str_and_init(LOOKUP_ENDPOINT, &init).map_err(transport)?;
    let window =
        web_sys::window().ok_or_else(|| LookupError::Transport("no window".to_string()))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(LookupError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let body = text
        .as_string()
        .ok_or_else(|| LookupError::Decode("response body is not text".to_string()))?;
    debug!("lookup response: {}", body);
    parse_lookup_response(&body)
}

/// Issue one lookup request, giving up after [`LOOKUP_TIMEOUT_MS`].
pub async fn fetch_lookup(run_type: RunType) -> Result<LookupResponse, LookupError> {
    info!("looking up best {} run", run_type);
    let request = Box::pin(post_lookup(run_type));
    let timeout = Box::pin(TimeoutFuture::new(LOOKUP_TIMEOUT_MS));
    match select(request, timeout).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(LookupError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_found_with_string_id() {
        let parsed =
            parse_lookup_response(r#"{"SpelunkerID":"abc","Level":13,"Result":125340}"#).unwrap();
        assert_eq!(
            parsed,
            LookupResponse::Found(LookupResult {
                spelunker_id: "abc".to_string(),
                level: 13,
                result: 125_340,
            })
        );
    }

    #[test]
    fn decodes_numeric_id() {
        let parsed = parse_lookup_response(r#"{"Result":42,"Level":5,"SpelunkerID":7}"#).unwrap();
        match parsed {
            LookupResponse::Found(r) => assert_eq!(r.spelunker_id, "7"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn error_key_takes_precedence() {
        let parsed = parse_lookup_response(
            r#"{"error":"Steam ID not found in top 5000","SpelunkerID":"a","Level":1,"Result":1}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            LookupResponse::Rejected {
                error: serde_json::json!("Steam ID not found in top 5000")
            }
        );
    }

    #[test]
    fn any_error_value_rejects() {
        let parsed = parse_lookup_response(r#"{"error":null}"#).unwrap();
        assert!(matches!(parsed, LookupResponse::Rejected { .. }));
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        for body in [
            "not json",
            "[1,2]",
            r#"{"Level":1,"Result":2}"#,
            r#"{"SpelunkerID":"a","Level":0,"Result":2}"#,
            r#"{"SpelunkerID":"a","Level":3,"Result":-1}"#,
        ] {
            assert!(
                matches!(parse_lookup_response(body), Err(LookupError::Decode(_))),
                "body {:?} should not decode",
                body
            );
        }
    }

    #[test]
    fn request_body_is_form_encoded() {
        assert_eq!(encode_request_body(RunType::Score), "runType=score");
        assert_eq!(encode_request_body(RunType::Speed), "runType=speed");
    }

    #[test]
    fn position_of_decoded_result() {
        let r = LookupResult {
            spelunker_id: "x".to_string(),
            level: 20,
            result: 0,
        };
        assert_eq!(r.position(), LevelPosition { world: 5, floor: 4 });
    }
}
