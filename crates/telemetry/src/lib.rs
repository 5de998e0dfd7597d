//! Request analytics for Vedaguru.
//!
//! Counts replies and failures per category, topic, model and error code,
//! and serves the aggregated summary the operator surfaces print.

pub mod analytics;

pub use analytics::{Analytics, AnalyticsSummary, RECENT_CAPACITY, ResponseSample, TOP_N};
