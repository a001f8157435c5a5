//! Test fixtures and payload generators.

use uuid::Uuid;

/// Admin token used by every test context.
pub fn admin_token() -> String {
    "test-admin-token".to_string()
}

/// A unique, valid email address.
pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

/// A valid lead submission.
pub fn lead_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": unique_email(),
        "interest": "racing"
    })
}

/// A valid contact submission.
pub fn contact_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": unique_email(),
        "message": "Hello from the test suite"
    })
}

/// A valid investor submission.
pub fn investor_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": unique_email(),
        "company": "Example Capital",
        "message": "Interested in the seed round"
    })
}

/// A page-view tracking payload.
pub fn pageview_payload(page: &str, referrer: Option<&str>) -> serde_json::Value {
    match referrer {
        Some(url) => serde_json::json!({ "page": page, "referrer": url }),
        None => serde_json::json!({ "page": page }),
    }
}

/// An event tracking payload.
pub fn event_payload(name: &str) -> serde_json::Value {
    serde_json::json!({ "name": name, "page": "/" })
}
