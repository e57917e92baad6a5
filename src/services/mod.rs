//! Services
//!
//! The pipeline stages and the orchestrator that sequences them. Each stage
//! owns its own failure/fallback policy; the orchestrator never retries.

pub mod analyzer;
pub mod cache;
pub mod generation;
pub mod orchestrator;
pub mod perception;
pub mod planner;
pub mod prompts;
pub mod retrieval;
pub mod style;

pub use analyzer::analyze;
pub use cache::{DocumentCache, MokaCacheBackend, NoopCacheBackend};
pub use orchestrator::{Orchestrator, PipelineState};
pub use perception::perceive;
