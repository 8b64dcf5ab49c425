//! Fixture lifecycle management
//!
//! A fixture pairs a generated identity with a live session: it registers
//! the identity, logs in, and hands both to the test body. Teardown is a
//! best-effort logout wired into `Drop`, so it runs on every exit path,
//! including a panicking assertion inside the test, and a failed logout
//! can never mask the test's own outcome.

use crate::assertions::assert_success;
use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::envelope::ResponseEnvelope;
use crate::identity::{self, TestIdentity};
use tracing::debug;

/// A registered, logged-in test user. The owning test borrows the session
/// for its duration; the token never outlives the fixture's scope.
pub struct UserFixture {
    pub identity: TestIdentity,
    pub client: ApiClient,
}

impl UserFixture {
    /// Registers and logs in a fresh ordinary user. Panics if either setup
    /// step fails: that is a harness/environment problem, not a scenario
    /// outcome.
    pub async fn registered(config: &HarnessConfig) -> Self {
        Self::bring_up(config, identity::generate(None)).await
    }

    /// Same lifecycle with an admin-marked identity. The server decides
    /// whether the resulting token actually carries admin capability;
    /// downstream 403s are a legitimate scenario outcome.
    pub async fn admin(config: &HarnessConfig) -> Self {
        Self::bring_up(config, identity::generate_admin()).await
    }

    async fn bring_up(config: &HarnessConfig, identity: TestIdentity) -> Self {
        let mut client = ApiClient::new(config).expect("failed to build API client");

        let response = client
            .register(&identity)
            .await
            .expect("register request failed during fixture setup");
        assert_success(&response, Some("注册成功"));

        let response = client
            .login(&identity.username, &identity.password)
            .await
            .expect("login request failed during fixture setup");
        assert_success(&response, Some("登录成功"));

        Self { identity, client }
    }

    /// Explicit teardown for tests that want the logout to complete before
    /// the runtime shuts down. Failures are logged and swallowed.
    pub async fn finish(mut self) -> Option<ResponseEnvelope> {
        match self.client.logout().await {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                debug!("fixture logout failed during teardown: {err}");
                None
            }
        }
        // Drop still runs but finds no token left.
    }
}

impl Drop for UserFixture {
    fn drop(&mut self) {
        let Some((http, logout_url, token)) = self.client.take_teardown_parts() else {
            return;
        };
        // Fire-and-forget: the logout must never fail the test, and during
        // an unwind there is nothing to await on anyway.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime at fixture teardown, skipping logout");
            return;
        };
        handle.spawn(async move {
            match http
                .post(logout_url)
                .header(reqwest::header::AUTHORIZATION, token)
                .send()
                .await
            {
                Ok(_) => debug!("fixture logout completed"),
                Err(err) => debug!("fixture logout failed during teardown: {err}"),
            }
        });
    }
}
