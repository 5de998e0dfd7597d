//! Prompt construction and query classification for Vedaguru.
//!
//! Everything in this crate is pure and deterministic: static persona and
//! guidance tables, the topic catalog, the complexity heuristic and the
//! decision table that turns it into model parameters.

pub mod builder;
pub mod catalog;
pub mod classifier;
pub mod fallback;
pub mod guidance;
pub mod persona;

pub use builder::build_system_prompt;
pub use classifier::{GenerationProfile, ModelTier, QueryAnalysis, is_short_query};
pub use guidance::{GuidanceMatch, TopicGuidance};
pub use persona::PromptProfile;
