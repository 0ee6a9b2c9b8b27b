//! Retail KPI monitoring pipeline.
//!
//! A linear batch pipeline over an in-memory transaction set: cleaning,
//! monthly KPI aggregation, threshold-based drop detection, per-dimension
//! root cause attribution, trailing-window impact estimation and fixed
//! recommendations. Every stage is a pure function over its input; the
//! cleaned transaction slice is the shared, read-only foundation.

pub mod cleaning;
pub mod drops;
pub mod error;
pub mod impact;
pub mod kpi;
pub mod output;
pub mod pipeline;
pub mod recommend;
pub mod root_cause;
pub mod types;
pub mod util;

pub use error::{PipelineError, Result};
