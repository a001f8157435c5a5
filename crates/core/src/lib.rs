//! Core types, sanitization, and validation for the intake engine.

pub mod analytics;
pub mod error;
pub mod limits;
pub mod payload;
pub mod record;
pub mod sanitize;

pub use analytics::{AnalyticsDoc, AnalyticsEvent, ReferrerEntry};
pub use error::{Error, Result};
pub use payload::{ContactPayload, InvestorPayload, LeadPayload, Submission};
pub use record::{Collection, IdGenerator, Record, RecordKind};
