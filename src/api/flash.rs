use log::{error, warn};
use std::sync::Arc;

use super::types::RedeemResult;
use crate::storage::{Storage, StorageError, REDEEM_RESULT_KEY};

/// hands a redeem result from the landing page to the confirmation page exactly once
#[derive(Clone)]
pub struct RedeemFlash {
    session: Arc<dyn Storage>,
}

impl RedeemFlash {
    pub fn new(session: Arc<dyn Storage>) -> Self {
        Self { session }
    }

    pub fn store(&self, result: &RedeemResult) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(result)?;
        self.session.set(REDEEM_RESULT_KEY, &serialized)
    }

    /// reads and clears the stored result; a second call returns None
    pub fn take(&self) -> Option<RedeemResult> {
        let mut taken = None;
        if let Err(e) = self.session.update(REDEEM_RESULT_KEY, &mut |existing| {
            taken = existing;
            None
        }) {
            error!("Failed to clear redeem result: {}", e);
        }

        let raw = taken?;
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Failed to parse redeem result: {}", e);
                None
            }
        }
    }
}
