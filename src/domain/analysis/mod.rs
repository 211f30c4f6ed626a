//! Analysis domain: the iterative tool-orchestration core.
//!
//! - [`AnalysisEngine`] drives the reasoning/tool-call loop
//! - [`Decision`] classifies free-form reasoning output into typed actions
//! - [`AnalysisState`] accumulates tool calls and collected data
//! - [`report`] and [`prompts`] build the text sent to the reasoning engine
//! - [`scenarios`] routes queries to analysis types by keyword

mod decision;
mod engine;
pub mod prompts;
pub mod report;
pub mod scenarios;
mod state;

pub use decision::Decision;
pub use engine::{AnalysisEngine, AnalysisMode, AnalysisOutcome, EngineConfig};
pub use state::{AnalysisState, CategoryRegistry, DataCategory, ToolCallRecord};
