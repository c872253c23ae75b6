use chrono::{SecondsFormat, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::storage::{Storage, API_CALLS_KEY};

pub const MAX_LOGGED_CALLS: usize = 50;

/// one outbound request as shown in the debug panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCall {
    pub timestamp: String,
    pub endpoint: String,
    pub request: Value,
    pub response: Value,
    /// 0 when no response arrived
    pub status: u16,
}

impl ApiCall {
    pub fn new(endpoint: &str, request: Value, response: Value, status: u16) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            endpoint: endpoint.to_string(),
            request,
            response,
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// bounded log of outbound calls kept in session storage
#[derive(Clone)]
pub struct ApiCallLog {
    session: Arc<dyn Storage>,
    capacity: usize,
}

impl ApiCallLog {
    pub fn new(session: Arc<dyn Storage>) -> Self {
        Self::with_capacity(session, MAX_LOGGED_CALLS)
    }

    pub fn with_capacity(session: Arc<dyn Storage>, capacity: usize) -> Self {
        Self { session, capacity }
    }

    pub fn record(&self, call: ApiCall) {
        let capacity = self.capacity;
        let mut call = Some(call);
        let result = self.session.update(API_CALLS_KEY, &mut |existing| {
            let mut calls = existing.as_deref().map(parse_calls).unwrap_or_default();
            calls.extend(call.take());
            if calls.len() > capacity {
                let excess = calls.len() - capacity;
                calls.drain(..excess);
            }
            match serde_json::to_string(&calls) {
                Ok(serialized) => Some(serialized),
                Err(e) => {
                    error!("Failed to serialize API call log: {}", e);
                    existing
                }
            }
        });

        if let Err(e) = result {
            error!("Failed to persist API call log: {}", e);
        }
    }

    /// oldest first
    pub fn entries(&self) -> Vec<ApiCall> {
        self.session
            .get(API_CALLS_KEY)
            .as_deref()
            .map(parse_calls)
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Err(e) = self.session.remove(API_CALLS_KEY) {
            error!("Failed to clear API call log: {}", e);
        }
    }
}

fn parse_calls(raw: &str) -> Vec<ApiCall> {
    match serde_json::from_str(raw) {
        Ok(calls) => calls,
        Err(e) => {
            warn!("Discarding malformed API call log: {}", e);
            Vec::new()
        }
    }
}
