//! Test identity generation
//!
//! Usernames combine the current unix timestamp with a process-wide
//! sequence number, so two identities can never collide within one run
//! even when generated concurrently in the same clock tick. The caller
//! may add a suffix to make worker provenance visible in server logs.
//! Password, email, and phone are deterministic functions of the
//! username/timestamp so a failing test can be replayed by hand.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Role marker for ordinary users.
pub const ROLE_USER: u8 = 1;

/// Role marker requesting administrator privileges at registration.
/// Whether it is honored is decided server-side.
pub const ROLE_ADMIN: u8 = 2;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A generated test user's credential set. Immutable after creation and
/// never persisted beyond the owning test.
#[derive(Debug, Clone)]
pub struct TestIdentity {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: u8,
}

/// Generates a fresh ordinary-user identity.
pub fn generate(suffix: Option<&str>) -> TestIdentity {
    let timestamp = Utc::now().timestamp();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let username = format!("testuser{}x{}{}", timestamp, seq, suffix.unwrap_or(""));
    TestIdentity {
        email: Some(format!("{}@test.com", username)),
        phone: Some(format!("138{:08}", timestamp % 100_000_000)),
        username,
        password: "test123456".to_string(),
        role_id: ROLE_USER,
    }
}

/// Generates an identity marked for administrator escalation at
/// registration time.
pub fn generate_admin() -> TestIdentity {
    let timestamp = Utc::now().timestamp();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let username = format!("admin{}x{}", timestamp, seq);
    TestIdentity {
        email: Some(format!("{}@admin.com", username)),
        phone: None,
        username,
        password: "admin123456".to_string(),
        role_id: ROLE_ADMIN,
    }
}
