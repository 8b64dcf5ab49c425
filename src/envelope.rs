//! Wire envelope shared by every endpoint of the user-management service
//!
//! All endpoints answer HTTP 200 with a JSON body
//! `{code, businessCode, message, data}`. The `code` field carries an
//! HTTP-style status, `businessCode` is the independent success flag
//! (0 success, 1 failure). The two must agree: `code == 200` exactly when
//! `businessCode == 0`; anything else is a protocol violation.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Business success marker (`businessCode == 0`).
pub const BUSINESS_OK: i32 = 0;

/// Business failure marker (`businessCode == 1`).
pub const BUSINESS_FAIL: i32 = 1;

/// The uniform response wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub code: u16,
    #[serde(rename = "businessCode")]
    pub business_code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    /// Envelope synthesized client-side when `logout` is called without a
    /// held token. No network round trip is made for this case.
    pub fn not_logged_in() -> Self {
        Self {
            code: 401,
            business_code: BUSINESS_FAIL,
            message: "未登录".to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200 && self.business_code == BUSINESS_OK
    }

    /// Checks the cross-field invariant: 200 pairs with business success,
    /// every other code pairs with business failure.
    pub fn is_consistent(&self) -> bool {
        if self.code == 200 {
            self.business_code == BUSINESS_OK
        } else {
            self.business_code == BUSINESS_FAIL
        }
    }

    /// Decodes `data` into a typed payload record.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self
            .data
            .clone()
            .with_context(|| format!("envelope has no data payload: {}", self.fragment()))?;
        serde_json::from_value(data)
            .with_context(|| format!("envelope data has unexpected shape: {}", self.fragment()))
    }

    /// Compact rendering used in assertion failure messages.
    pub fn fragment(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

// ============================================================================
// Typed response payloads
// ============================================================================
//
// Per-endpoint records with optional fields, so shape regressions surface as
// decode errors instead of silently missing map keys.

/// `POST /user/register` success payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role_code: Option<i32>,
}

/// `POST /user/login` success payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role_code: Option<i32>,
    pub expires_in: Option<i64>,
}

/// `GET /user/userInfo` payload and admin listing row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub role_code: Option<i32>,
}

/// `GET /user/permissions` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsData {
    pub role_code: Option<i32>,
    pub permissions: Option<Vec<String>>,
}

/// `GET /admin/users` paginated payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub total: i64,
    pub rows: Vec<UserProfile>,
}

/// `GET /admin/users/{id}/quota` payload. Both fields are null until a
/// quota has been set for the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaData {
    pub value: Option<i64>,
    pub ttl_seconds: Option<i64>,
}

// ============================================================================
// Typed request payloads
// ============================================================================

/// `PUT /user/update` body. Only the present fields are transmitted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body for `POST /admin/users` and `PUT /admin/users`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u8>,
}
