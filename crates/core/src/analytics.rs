//! The mutable analytics document.
//!
//! A single JSON object holding three independent mappings: per-day page-view
//! counts, a bounded most-recent-first referrer list, and per-day event lists
//! pruned to the last 7 calendar days on every write. All mutation goes
//! through the store's read-modify-write primitive; the methods here are the
//! pure transformations applied under its lock.

use chrono::{Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::limits::{EVENT_RETENTION_DAYS, MAX_REFERRERS};

/// One remembered referrer, most recent at the front of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerEntry {
    pub url: String,
    pub timestamp: String,
}

/// One tracked custom event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub timestamp: String,
}

/// The whole analytics document, persisted as one JSON object.
///
/// Date keys are `YYYY-MM-DD` strings so the on-disk layout stays readable
/// and sorts chronologically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsDoc {
    /// date -> page path -> view count
    pub page_views: BTreeMap<String, BTreeMap<String, u64>>,
    /// Bounded list, most recent first.
    pub referrers: Vec<ReferrerEntry>,
    /// date -> events recorded that day, in arrival order.
    pub events: BTreeMap<String, Vec<AnalyticsEvent>>,
}

impl AnalyticsDoc {
    /// Count one page view and optionally remember the referrer.
    pub fn record_page_view(mut self, page: &str, referrer: Option<&str>) -> Self {
        let today = date_key(Utc::now().date_naive());
        *self
            .page_views
            .entry(today)
            .or_default()
            .entry(page.to_string())
            .or_insert(0) += 1;

        if let Some(url) = referrer {
            self.referrers.insert(
                0,
                ReferrerEntry {
                    url: url.to_string(),
                    timestamp: now_rfc3339(),
                },
            );
            self.referrers.truncate(MAX_REFERRERS);
        }

        self.pruned(Utc::now().date_naive())
    }

    /// Append one custom event under today's date key.
    pub fn record_event(mut self, name: &str, page: Option<&str>) -> Self {
        let today = Utc::now().date_naive();
        self.events
            .entry(date_key(today))
            .or_default()
            .push(AnalyticsEvent {
                name: name.to_string(),
                page: page.map(str::to_string),
                timestamp: now_rfc3339(),
            });

        self.pruned(today)
    }

    /// Drop event date keys older than the retention window.
    ///
    /// Runs on every write, so stale days disappear on the next mutation
    /// after they age out. Page-view counts are kept indefinitely.
    pub fn pruned(mut self, today: NaiveDate) -> Self {
        let cutoff = today - Duration::days(EVENT_RETENTION_DAYS);
        self.events.retain(|key, _| {
            NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .map(|date| date > cutoff)
                .unwrap_or(false)
        });
        self
    }

    /// Total page views recorded on a given date.
    pub fn views_on(&self, date: NaiveDate) -> u64 {
        self.page_views
            .get(&date_key(date))
            .map(|pages| pages.values().sum())
            .unwrap_or(0)
    }

    /// Total page views over the last `days` calendar days, today included.
    pub fn views_last_days(&self, days: i64) -> u64 {
        let today = Utc::now().date_naive();
        (0..days)
            .map(|offset| self.views_on(today - Duration::days(offset)))
            .sum()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
