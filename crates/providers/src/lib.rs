//! LLM provider implementations for Vedaguru.
//!
//! Every backend implements `vedaguru_core::Provider` as a single attempt.
//! [`retry::complete_with_retry`] layers timeouts and backoff on top, and the
//! router picks the backend from configuration.

pub mod openai_compat;
pub mod retry;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use retry::{AttemptOutcome, Completion, FailureTag, RetryFailure, RetryPolicy, complete_with_retry};
pub use router::{ProviderRouter, RouteError, build_from_config};
