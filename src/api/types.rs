use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub tg_id: String,
    pub lang: String,
    pub clicked_at: String,
}

/// normalized outcome of a redemption attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedeemResult {
    Ok { granted: Vec<String> },
    NotOk { reason: String },
    Error,
}

impl RedeemResult {
    pub fn status(&self) -> &'static str {
        match self {
            RedeemResult::Ok { .. } => "OK",
            RedeemResult::NotOk { .. } => "NOT_OK",
            RedeemResult::Error => "ERROR",
        }
    }

    /// decodes a 2xx response body
    ///
    /// Structured bodies (`{"granted": [...]}` / `{"reason": "..."}`) are the
    /// primary contract. The older `{"result": "OK {granted:[77,73]}"}` string
    /// form is still accepted, but only when the whole string is well formed.
    pub fn from_body(body: &str) -> Result<Self, RedeemError> {
        let value: Value = serde_json::from_str(body)?;
        let object = value
            .as_object()
            .ok_or_else(|| RedeemError::Malformed("response is not a JSON object".to_string()))?;

        if let Some(granted) = object.get("granted") {
            let ids = granted
                .as_array()
                .ok_or_else(|| RedeemError::Malformed("granted is not an array".to_string()))?
                .iter()
                .map(grant_id)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(RedeemResult::Ok { granted: ids });
        }

        if let Some(reason) = object.get("reason") {
            return match reason.as_str() {
                Some(reason) if !reason.trim().is_empty() => Ok(RedeemResult::NotOk {
                    reason: reason.trim().to_string(),
                }),
                _ => Err(RedeemError::Malformed(format!("unusable reason: {}", reason))),
            };
        }

        match object.get("result").and_then(Value::as_str) {
            Some(encoded) => Self::from_encoded(encoded),
            None => Err(RedeemError::Malformed(format!(
                "unexpected response format: {}",
                body
            ))),
        }
    }

    /// decodes `OK {granted:[id,...]}` or `NOT_OK {reason: CODE}`
    pub fn from_encoded(encoded: &str) -> Result<Self, RedeemError> {
        static OK_RE: OnceLock<Regex> = OnceLock::new();
        static NOT_OK_RE: OnceLock<Regex> = OnceLock::new();

        let encoded = encoded.trim();
        let ok_re = OK_RE.get_or_init(|| {
            Regex::new(r"^OK\s*\{\s*granted\s*:\s*\[(?P<ids>[^\[\]{}]*)\]\s*\}$")
                .expect("valid granted pattern")
        });
        let not_ok_re = NOT_OK_RE.get_or_init(|| {
            Regex::new(
                r#"^NOT_OK\s*\{\s*reason\s*:\s*(?:"(?P<quoted>[A-Za-z0-9_]+)"|(?P<bare>[A-Za-z0-9_]+))\s*\}$"#,
            )
            .expect("valid reason pattern")
        });

        if let Some(caps) = ok_re.captures(encoded) {
            let ids = caps.name("ids").map(|m| m.as_str().trim()).unwrap_or("");
            if ids.is_empty() {
                return Ok(RedeemResult::Ok { granted: Vec::new() });
            }
            let granted = ids
                .split(',')
                .map(encoded_grant_id)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(RedeemResult::Ok { granted });
        }

        if let Some(caps) = not_ok_re.captures(encoded) {
            if let Some(reason) = caps.name("quoted").or_else(|| caps.name("bare")) {
                return Ok(RedeemResult::NotOk {
                    reason: reason.as_str().to_string(),
                });
            }
        }

        Err(RedeemError::Malformed(format!(
            "unrecognized result string: {}",
            encoded
        )))
    }
}

fn grant_id(value: &Value) -> Result<String, RedeemError> {
    match value {
        Value::String(id) if is_plain_id(id) => Ok(id.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        other => Err(RedeemError::Malformed(format!("invalid granted id: {}", other))),
    }
}

fn encoded_grant_id(raw: &str) -> Result<String, RedeemError> {
    let id = raw.trim();
    let id = id
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(id);
    if is_plain_id(id) {
        Ok(id.to_string())
    } else {
        Err(RedeemError::Malformed(format!("invalid granted id: '{}'", raw)))
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug)]
pub enum RedeemError {
    HttpError(reqwest::Error),
    TimeoutError,
    StatusCodeError(u16),
    JsonError(serde_json::Error),
    Malformed(String),
}

impl fmt::Display for RedeemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedeemError::HttpError(e) => write!(f, "HTTP error: {}", e),
            RedeemError::TimeoutError => write!(f, "Request timed out"),
            RedeemError::StatusCodeError(code) => write!(f, "HTTP status code error: {}", code),
            RedeemError::JsonError(e) => write!(f, "Invalid JSON: {}", e),
            RedeemError::Malformed(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for RedeemError {}

impl From<reqwest::Error> for RedeemError {
    fn from(err: reqwest::Error) -> Self {
        RedeemError::HttpError(err)
    }
}

impl From<serde_json::Error> for RedeemError {
    fn from(err: serde_json::Error) -> Self {
        RedeemError::JsonError(err)
    }
}
