//! Field length caps applied before persistence.
//!
//! Every string field is truncated to its cap during sanitization, so the
//! flat-file store never grows unboundedly from a single hostile submission.
//!
//! The `#[validate]` derive macro requires literal values in attributes, so
//! the payload structs in `payload.rs` duplicate these numbers. Keep both in
//! sync when modifying.

/// Submitter name max length.
pub const MAX_NAME_LEN: usize = 100;

/// Email address max length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Contact form subject max length.
pub const MAX_SUBJECT_LEN: usize = 150;

/// Investor company name max length.
pub const MAX_COMPANY_LEN: usize = 150;

/// Lead interest tag max length.
pub const MAX_INTEREST_LEN: usize = 64;

/// Free-form message max length.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Tracked page path max length.
pub const MAX_PAGE_LEN: usize = 512;

/// Referrer URL max length.
/// Matches HTTP Referer header limit.
pub const MAX_REFERRER_LEN: usize = 2048;

/// Analytics event name max length.
pub const MAX_EVENT_NAME_LEN: usize = 64;

/// Referrer entries retained in the analytics document, most recent first.
pub const MAX_REFERRERS: usize = 100;

/// Calendar days of analytics events retained.
pub const EVENT_RETENTION_DAYS: i64 = 7;
