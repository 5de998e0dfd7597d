//! Thread-safe request analytics: response times, popularity and errors.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// How many entries each "top" list in a summary carries.
pub const TOP_N: usize = 5;

/// Samples kept for [`Analytics::recent`]. Older ones only live on in the totals.
pub const RECENT_CAPACITY: usize = 1000;

/// One successful reply.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSample {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub topic: String,
    pub model: String,
    pub response_time_secs: f64,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Default)]
struct Counters {
    /// Newest last, at most `RECENT_CAPACITY`.
    recent: VecDeque<ResponseSample>,
    /// Running sum over every tracked response, not just `recent`.
    total_response_time_secs: f64,
    per_category: HashMap<String, u64>,
    /// Keyed `category:topic`.
    per_topic: HashMap<String, u64>,
    per_model: HashMap<String, u64>,
    errors: HashMap<String, u64>,
    total_requests: u64,
    successful_requests: u64,
    total_tokens: u64,
}

/// Aggregated view of everything tracked so far.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    /// Percentage in `0.0..=100.0`.
    pub success_rate: f64,
    pub avg_response_time_secs: f64,
    pub total_tokens: u64,
    pub top_categories: Vec<(String, u64)>,
    pub top_topics: Vec<(String, u64)>,
    pub top_models: Vec<(String, u64)>,
    pub top_errors: Vec<(String, u64)>,
    pub timestamp: DateTime<Utc>,
}

/// Collects per-request counters. Shared with the chat service behind an `Arc`.
#[derive(Debug, Default)]
pub struct Analytics {
    counters: RwLock<Counters>,
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reply that came from the model (or the cache).
    pub fn track_response(
        &self,
        category: &str,
        topic: &str,
        model: &str,
        response_time_secs: f64,
        total_tokens: Option<u32>,
    ) {
        let mut c = self.counters.write().unwrap();
        if c.recent.len() == RECENT_CAPACITY {
            c.recent.pop_front();
        }
        c.recent.push_back(ResponseSample {
            timestamp: Utc::now(),
            category: category.to_string(),
            topic: topic.to_string(),
            model: model.to_string(),
            response_time_secs,
            total_tokens,
        });
        *c.per_category.entry(category.to_string()).or_default() += 1;
        *c.per_topic.entry(format!("{category}:{topic}")).or_default() += 1;
        *c.per_model.entry(model.to_string()).or_default() += 1;
        c.total_requests += 1;
        c.successful_requests += 1;
        c.total_response_time_secs += response_time_secs;
        c.total_tokens += u64::from(total_tokens.unwrap_or(0));

        debug!(
            category,
            topic,
            model,
            response_time_secs,
            "Tracked response"
        );
    }

    /// Record a request that ended without model output.
    pub fn track_error(&self, category: &str, topic: &str, code: &str, detail: &str) {
        let mut c = self.counters.write().unwrap();
        *c.errors.entry(code.to_string()).or_default() += 1;
        c.total_requests += 1;

        debug!(category, topic, code, detail, "Tracked error");
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let c = self.counters.read().unwrap();

        let avg_response_time_secs = if c.successful_requests == 0 {
            0.0
        } else {
            c.total_response_time_secs / c.successful_requests as f64
        };
        let success_rate = if c.total_requests == 0 {
            0.0
        } else {
            c.successful_requests as f64 / c.total_requests as f64 * 100.0
        };

        AnalyticsSummary {
            total_requests: c.total_requests,
            successful_requests: c.successful_requests,
            success_rate,
            avg_response_time_secs,
            total_tokens: c.total_tokens,
            top_categories: top(&c.per_category),
            top_topics: top(&c.per_topic),
            top_models: top(&c.per_model),
            top_errors: top(&c.errors),
            timestamp: Utc::now(),
        }
    }

    /// Most recent samples, newest last.
    pub fn recent(&self, limit: usize) -> Vec<ResponseSample> {
        let c = self.counters.read().unwrap();
        let start = c.recent.len().saturating_sub(limit);
        c.recent.iter().skip(start).cloned().collect()
    }

    pub fn reset(&self) {
        *self.counters.write().unwrap() = Counters::default();
    }
}

/// Highest counts first; ties broken by name so output is stable.
fn top(counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_is_all_zero() {
        let s = Analytics::new().summary();
        assert_eq!(s.total_requests, 0);
        assert_eq!(s.success_rate, 0.0);
        assert_eq!(s.avg_response_time_secs, 0.0);
        assert!(s.top_categories.is_empty());
    }

    #[test]
    fn responses_and_errors_feed_the_rates() {
        let a = Analytics::new();
        a.track_response("epics", "ramayana", "mistral-small-latest", 1.0, Some(120));
        a.track_response("epics", "ramayana", "mistral-small-latest", 3.0, None);
        a.track_response("vedas", "rigveda", "mistral-large-latest", 2.0, Some(80));
        a.track_error("vedas", "rigveda", "timeout", "no response within 25s");

        let s = a.summary();
        assert_eq!(s.total_requests, 4);
        assert_eq!(s.successful_requests, 3);
        assert!((s.success_rate - 75.0).abs() < 1e-9);
        assert!((s.avg_response_time_secs - 2.0).abs() < 1e-9);
        assert_eq!(s.total_tokens, 200);
        assert_eq!(s.top_categories[0], ("epics".to_string(), 2));
        assert_eq!(s.top_topics[0], ("epics:ramayana".to_string(), 2));
        assert_eq!(s.top_errors, vec![("timeout".to_string(), 1)]);
    }

    #[test]
    fn top_lists_are_capped_and_stable() {
        let a = Analytics::new();
        for (i, cat) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            for _ in 0..=i {
                a.track_error(cat, "t", &format!("http_50{i}"), "");
            }
        }
        a.track_error("x", "t", "api_error", "");
        a.track_error("y", "t", "connection", "");

        let s = a.summary();
        assert_eq!(s.top_errors.len(), TOP_N);
        assert_eq!(s.top_errors[0], ("http_506".to_string(), 7));
        assert_eq!(s.top_errors[4], ("http_502".to_string(), 3));

        let b = Analytics::new();
        b.track_error("c", "t", "zeta", "");
        b.track_error("c", "t", "alpha", "");
        let ties = b.summary().top_errors;
        assert_eq!(ties[0].0, "alpha");
    }

    #[test]
    fn recent_and_reset() {
        let a = Analytics::new();
        for i in 0..3 {
            a.track_response("knowledge", "yoga", "sonar", f64::from(i), None);
        }
        let recent = a.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].response_time_secs, 2.0);

        a.reset();
        assert_eq!(a.summary().total_requests, 0);
    }

    #[test]
    fn recent_window_is_capped_but_totals_are_not() {
        let a = Analytics::new();
        let n = RECENT_CAPACITY + 250;
        for i in 0..n {
            a.track_response("vedas", "rigveda", "mistral-small-latest", if i % 2 == 0 { 1.0 } else { 3.0 }, Some(1));
        }

        let recent = a.recent(usize::MAX);
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent.last().unwrap().response_time_secs, 3.0);
        assert_eq!(a.counters.read().unwrap().recent.len(), RECENT_CAPACITY);

        let s = a.summary();
        assert_eq!(s.successful_requests, n as u64);
        assert_eq!(s.total_tokens, n as u64);
        assert!((s.avg_response_time_secs - 2.0).abs() < 1e-9);
    }
}
