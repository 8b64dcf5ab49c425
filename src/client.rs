//! Session-bound API client
//!
//! One `ApiClient` wraps one logical user session against one base URL.
//! The held token and cached user info are explicit owned fields, so any
//! number of independent sessions can coexist in a single process.
//!
//! Every method issues exactly one HTTP request and returns the parsed
//! envelope unconditionally; business failures are data, not errors. Only
//! transport problems (connect/timeout/malformed body) surface as
//! `ClientError`, and those are fatal to the calling test. Nothing is
//! retried.
//!
//! When API routes or request formats change, update only this file.

use crate::config::HarnessConfig;
use crate::envelope::{AdminUserPayload, LoginData, ProfilePatch, ResponseEnvelope};
use crate::identity::TestIdentity;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Transport-level failure. Distinct from an assertion failure: the
/// request never produced a well-formed envelope to assert against.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(#[source] reqwest::Error),
    #[error("unexpected payload shape: {0}")]
    Payload(String),
}

/// Stateful client for one user session.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user_url: String,
    admin_url: String,
    token: Option<String>,
    user_info: Option<LoginData>,
}

impl ApiClient {
    /// Creates an unauthenticated client against the configured base URL.
    pub fn new(config: &HarnessConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            user_url: format!("{}/user", base_url),
            admin_url: format!("{}/admin/users", base_url),
            http,
            base_url,
            token: None,
            user_info: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The currently held session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Overrides the held token. Used by edge-case suites to inject an
    /// invalid token; the server remains the authority on its validity.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Login payload cached from the last successful `login`.
    pub fn user_info(&self) -> Option<&LoginData> {
        self.user_info.as_ref()
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, token),
            None => builder,
        }
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<ResponseEnvelope, ClientError> {
        let response = self.authed(builder).send().await?;
        let envelope = response
            .json::<ResponseEnvelope>()
            .await
            .map_err(ClientError::MalformedEnvelope)?;
        debug!(
            code = envelope.code,
            business_code = envelope.business_code,
            message = %envelope.message,
            "response envelope"
        );
        Ok(envelope)
    }

    // ========================================================================
    // Self-service endpoints
    // ========================================================================

    /// POST /user/register (form-encoded)
    pub async fn register(&self, identity: &TestIdentity) -> Result<ResponseEnvelope, ClientError> {
        let mut form: Vec<(&str, String)> = vec![
            ("username", identity.username.clone()),
            ("password", identity.password.clone()),
            ("roleId", identity.role_id.to_string()),
        ];
        if let Some(email) = &identity.email {
            form.push(("email", email.clone()));
        }
        if let Some(phone) = &identity.phone {
            form.push(("phone", phone.clone()));
        }
        self.dispatch(
            self.http
                .post(format!("{}/register", self.user_url))
                .form(&form),
        )
        .await
    }

    /// POST /user/login (form-encoded)
    ///
    /// On success the returned token is attached to the session and echoed
    /// on every subsequent request until `logout` or a manual override. On
    /// failure the held state is left untouched.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<ResponseEnvelope, ClientError> {
        let form = [("username", username), ("password", password)];
        let envelope = self
            .dispatch(self.http.post(format!("{}/login", self.user_url)).form(&form))
            .await?;
        if envelope.is_success() {
            let data: LoginData = envelope
                .data_as()
                .map_err(|err| ClientError::Payload(err.to_string()))?;
            self.token = Some(data.token.clone());
            self.user_info = Some(data);
        }
        Ok(envelope)
    }

    /// POST /user/logout
    ///
    /// Short-circuits locally with a synthesized 401 envelope when no
    /// token is held; no network call is made in that case.
    pub async fn logout(&mut self) -> Result<ResponseEnvelope, ClientError> {
        if self.token.is_none() {
            return Ok(ResponseEnvelope::not_logged_in());
        }
        let envelope = self
            .dispatch(self.http.post(format!("{}/logout", self.user_url)))
            .await?;
        if envelope.is_success() {
            self.token = None;
            self.user_info = None;
        }
        Ok(envelope)
    }

    /// GET /user/userInfo
    pub async fn get_user_info(&self) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(self.http.get(format!("{}/userInfo", self.user_url)))
            .await
    }

    /// PUT /user/update (JSON)
    pub async fn update_user_info(
        &self,
        patch: &ProfilePatch,
    ) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(
            self.http
                .put(format!("{}/update", self.user_url))
                .json(patch),
        )
        .await
    }

    /// PATCH /user/updateAvatar (form-encoded)
    pub async fn update_avatar(&self, avatar_url: &str) -> Result<ResponseEnvelope, ClientError> {
        let form = [("avatarUrl", avatar_url)];
        self.dispatch(
            self.http
                .patch(format!("{}/updateAvatar", self.user_url))
                .form(&form),
        )
        .await
    }

    /// PATCH /user/updatePwd (JSON)
    ///
    /// A successful change invalidates the current session server-side,
    /// so the held token is dropped as well.
    pub async fn update_password(
        &mut self,
        old_pwd: &str,
        new_pwd: &str,
        re_pwd: &str,
    ) -> Result<ResponseEnvelope, ClientError> {
        let body = json!({"oldPwd": old_pwd, "newPwd": new_pwd, "rePwd": re_pwd});
        let envelope = self
            .dispatch(
                self.http
                    .patch(format!("{}/updatePwd", self.user_url))
                    .json(&body),
            )
            .await?;
        if envelope.is_success() {
            self.token = None;
            self.user_info = None;
        }
        Ok(envelope)
    }

    /// GET /user/permissions
    pub async fn get_permissions(&self) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(self.http.get(format!("{}/permissions", self.user_url)))
            .await
    }

    // ========================================================================
    // Administrative endpoints
    // ========================================================================
    //
    // Authorization is enforced server-side; a non-admin token simply gets
    // the 403 envelope back.

    /// GET /admin/users?pageNum=..&pageSize=..[&username=..]
    pub async fn admin_list_users(
        &self,
        page_num: u32,
        page_size: u32,
        username: Option<&str>,
    ) -> Result<ResponseEnvelope, ClientError> {
        let mut query: Vec<(&str, String)> = vec![
            ("pageNum", page_num.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(username) = username {
            query.push(("username", username.to_string()));
        }
        self.dispatch(self.http.get(&self.admin_url).query(&query))
            .await
    }

    /// POST /admin/users (JSON)
    pub async fn admin_add_user(
        &self,
        user: &AdminUserPayload,
    ) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(self.http.post(&self.admin_url).json(user))
            .await
    }

    /// PUT /admin/users (JSON)
    pub async fn admin_update_user(
        &self,
        user: &AdminUserPayload,
    ) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(self.http.put(&self.admin_url).json(user))
            .await
    }

    /// DELETE /admin/users/{id}
    pub async fn admin_delete_user(&self, user_id: i64) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(
            self.http
                .delete(format!("{}/{}", self.admin_url, user_id)),
        )
        .await
    }

    /// GET /admin/users/{id}/quota
    pub async fn admin_get_quota(&self, user_id: i64) -> Result<ResponseEnvelope, ClientError> {
        self.dispatch(
            self.http
                .get(format!("{}/{}/quota", self.admin_url, user_id)),
        )
        .await
    }

    /// PATCH /admin/users/{id}/quota (JSON)
    pub async fn admin_set_quota(
        &self,
        user_id: i64,
        value: i64,
        ttl_hours: i64,
    ) -> Result<ResponseEnvelope, ClientError> {
        let body = json!({"value": value, "ttlHours": ttl_hours});
        self.dispatch(
            self.http
                .patch(format!("{}/{}/quota", self.admin_url, user_id))
                .json(&body),
        )
        .await
    }

    /// Hands the pieces needed for a fire-and-forget logout to the fixture
    /// teardown, clearing the held session state in the process.
    pub(crate) fn take_teardown_parts(&mut self) -> Option<(reqwest::Client, String, String)> {
        self.user_info = None;
        let token = self.token.take()?;
        let logout_url = format!("{}/logout", self.user_url);
        Some((self.http.clone(), logout_url, token))
    }
}
