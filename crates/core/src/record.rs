//! Submitted records and the collections that hold them.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Discriminator for the three intake forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Lead,
    Contact,
    Investor,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Contact => "contact",
            Self::Investor => "investor",
        }
    }

    /// The collection this kind of record is persisted to.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Lead => Collection::Leads,
            Self::Contact => Collection::Contacts,
            Self::Investor => Collection::Investors,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named append-only collection, backed by one JSON array file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Leads,
    Contacts,
    Investors,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Leads, Self::Contacts, Self::Investors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::Contacts => "contacts",
            Self::Investors => "investors",
        }
    }

    /// File name within the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Leads => "leads.json",
            Self::Contacts => "contacts.json",
            Self::Investors => "investors.json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "leads" => Some(Self::Leads),
            "contacts" => Some(Self::Contacts),
            "investors" => Some(Self::Investors),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted submission.
///
/// Built by the HTTP boundary from an already-sanitized payload; the store
/// treats it as an opaque, trusted value. `id` and `timestamp` are assigned
/// at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Millisecond-derived identifier, strictly increasing within one process.
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Sanitized form fields in submission order.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Builds a record from sanitized `(field, value)` pairs.
    pub fn new(ids: &IdGenerator, kind: RecordKind, fields: Vec<(&str, String)>) -> Self {
        let mut map = serde_json::Map::new();
        for (name, value) in fields {
            map.insert(name.to_string(), serde_json::Value::String(value));
        }
        Self {
            id: ids.next_id(),
            kind,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            fields: map,
        }
    }

    /// String field accessor, for display and CSV export.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }
}

/// Wall-clock-derived id source.
///
/// Ids start from the current millisecond timestamp and are forced strictly
/// increasing within the process, so two submissions landing in the same
/// millisecond still get distinct ids. Ids from different processes or after
/// clock skew are unique per collection in practice but not globally ordered.
#[derive(Debug)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
