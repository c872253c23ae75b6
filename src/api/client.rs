use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use super::call_log::{ApiCall, ApiCallLog};
use super::types::{RedeemError, RedeemRequest, RedeemResult};
use crate::localization::Lang;
use crate::storage::Storage;

pub const REDEEM_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RedeemClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
    call_log: ApiCallLog,
}

impl RedeemClient {
    pub fn new(endpoint: Url, session: Arc<dyn Storage>) -> Result<Self, RedeemError> {
        Self::with_timeout(endpoint, REDEEM_TIMEOUT, session)
    }

    pub fn with_timeout(
        endpoint: Url,
        timeout: Duration,
        session: Arc<dyn Storage>,
    ) -> Result<Self, RedeemError> {
        let http = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            http,
            endpoint,
            timeout,
            call_log: ApiCallLog::new(session),
        })
    }

    pub fn call_log(&self) -> &ApiCallLog {
        &self.call_log
    }

    /// submits a redemption for the user; every failure collapses to `RedeemResult::Error`
    pub async fn redeem(&self, tg_id: &str, lang: Lang) -> RedeemResult {
        self.redeem_at(tg_id, lang, Utc::now()).await
    }

    pub async fn redeem_at(&self, tg_id: &str, lang: Lang, clicked_at: DateTime<Utc>) -> RedeemResult {
        let request = RedeemRequest {
            tg_id: tg_id.to_string(),
            lang: lang.code().to_string(),
            clicked_at: clicked_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        info!("Redeeming reward for tg_id {} (lang {})", tg_id, lang);

        let (result, status, response) = match timeout(self.timeout, self.send(&request)).await {
            Ok(Ok((status, body))) => {
                let response = serde_json::from_str::<Value>(&body)
                    .unwrap_or_else(|_| Value::String(body.clone()));
                (Self::interpret(status, &body), status, response)
            }
            Ok(Err(e)) => {
                error!("Redeem API error: {}", e);
                (RedeemResult::Error, 0, json!({ "error": e.to_string() }))
            }
            Err(_) => {
                let e = RedeemError::TimeoutError;
                error!("Redeem API error after {}ms: {}", self.timeout.as_millis(), e);
                (RedeemResult::Error, 0, json!({ "error": e.to_string() }))
            }
        };

        let request_value = serde_json::to_value(&request).unwrap_or(Value::Null);
        self.call_log
            .record(ApiCall::new(self.endpoint.as_str(), request_value, response, status));

        info!("Redeem result for tg_id {}: {}", tg_id, result.status());
        result
    }

    async fn send(&self, request: &RedeemRequest) -> Result<(u16, String), RedeemError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Redeem API responded {} with {} bytes", status, body.len());
        Ok((status, body))
    }

    fn interpret(status: u16, body: &str) -> RedeemResult {
        if !(200..300).contains(&status) {
            error!("Redeem API returned non-2xx: {}", RedeemError::StatusCodeError(status));
            return RedeemResult::Error;
        }

        match RedeemResult::from_body(body) {
            Ok(result) => result,
            Err(e) => {
                error!("Unexpected redeem response: {}", e);
                RedeemResult::Error
            }
        }
    }
}
