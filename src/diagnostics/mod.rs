//! Serializable reports produced alongside flow estimates: stage timings and
//! summaries of flow fields, per call or per pyramid level.

pub mod flow;
pub mod timing;

pub use flow::{FlowSummary, LevelReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
