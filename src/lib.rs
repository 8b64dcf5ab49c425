//! End-to-end test harness for the user-management HTTP API
//!
//! The service under test speaks a uniform JSON envelope
//! `{code, businessCode, message, data}` on every endpoint. This crate
//! provides the pieces the behavioral suites in `tests/` are built from:
//!
//! - [`identity`]: collision-free test identity generation
//! - [`client`]: a session-bound API client (one token per instance)
//! - [`assertions`]: envelope checks with fail-fast diagnostics
//! - [`fixture`]: registered/admin sessions with guaranteed teardown
//! - [`config`]: target base URL and timeout resolution

pub mod assertions;
pub mod client;
pub mod config;
pub mod envelope;
pub mod fixture;
pub mod identity;
pub mod logging;

// Re-export commonly used types for convenience
pub use client::{ApiClient, ClientError};
pub use config::HarnessConfig;
pub use envelope::{
    AdminUserPayload, LoginData, PermissionsData, ProfilePatch, QuotaData, RegisterData,
    ResponseEnvelope, UserPage, UserProfile,
};
pub use fixture::UserFixture;
pub use identity::{TestIdentity, ROLE_ADMIN, ROLE_USER};
