//! MeritMap - Placement-readiness evaluation over a pre-trained logistic model
//!
//! MeritMap turns a candidate profile into a readiness report through a
//! deterministic pipeline: input collection → scaling → logistic scoring →
//! categorization → curated feature attribution → report encoding.
//!
//! ## Modules
//!
//! - **Collector**: bounded form fields and the fitted 25-feature vector
//! - **Evaluator**: scaler/model evaluation, categories and feedback
//! - **Encoder**: JSON reports and text rendering

pub mod artifacts;
pub mod collector;
pub mod config;
pub mod encoder;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod pipeline;
pub mod render;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use artifacts::{FeatureScaler, LogisticModel, ModelArtifacts};
pub use collector::{CandidateProfile, ProfileInput};
pub use config::EvaluatorConfig;
pub use error::MeritMapError;
pub use evaluator::ReadinessEvaluator;
pub use pipeline::{evaluate_profile_json, ReadinessPipeline};
pub use types::{Branch, CuratedFeature, ReadinessCategory, ReadinessResult, ScalarField};

/// MeritMap version embedded in all reports
pub const MERITMAP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "meritmap";
