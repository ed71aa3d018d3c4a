// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod bootstrap;
pub mod collect;
pub mod config;
pub mod error;
pub mod insight;
pub mod knowledge;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::bootstrap::build_pipeline;
pub use crate::error::{
    AnalysisError, CollectionError, InsightError, PipelineError, ValidationError,
};
pub use crate::model::{
    InsightPayload, RawDataBundle, RawDocument, RecommendationRecord, RecommendationType,
    TrendRecord, ValidatedRecord, ValidationStatus,
};
pub use crate::pipeline::Pipeline;
