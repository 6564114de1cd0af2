use crate::components::roster::StoreId;
use crate::error::{check_in_error, AppResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a store's QR code, rotated every few seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInCode {
    pub store_id: StoreId,
    pub nonce: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CheckInCode {
    /// Issue a fresh code for a store
    pub fn issue(store_id: StoreId, now: DateTime<Utc>, ttl_seconds: u32) -> Self {
        Self {
            store_id,
            nonce: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Text carried by the QR image
    pub fn encode(&self) -> AppResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Parse scanned text back into a code
    pub fn decode(text: &str) -> AppResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(text.trim())
            .map_err(|_| check_in_error(&t!("checkin_invalid_code")))?;

        serde_json::from_slice(&bytes).map_err(|_| check_in_error(&t!("checkin_invalid_code")))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Countdown shown under the QR image
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Check the code is live and, when the worker belongs to a store, that it is theirs.
    ///
    /// A payload claiming a longer lifetime than `ttl_seconds` is rejected outright.
    pub fn verify(&self, store_id: Option<StoreId>, now: DateTime<Utc>, ttl_seconds: u32) -> AppResult<()> {
        let lifetime = self.expires_at - self.issued_at;
        if lifetime <= Duration::zero() || lifetime > Duration::seconds(ttl_seconds as i64) {
            return Err(check_in_error(&t!("checkin_invalid_code")));
        }
        if now < self.issued_at || self.is_expired(now) {
            return Err(check_in_error(&t!("checkin_expired")));
        }
        if let Some(store_id) = store_id {
            if store_id != self.store_id {
                return Err(check_in_error(&t!("checkin_wrong_store")));
            }
        }
        Ok(())
    }
}
