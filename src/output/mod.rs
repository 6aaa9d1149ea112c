//! Output handling: corpus persistence and run telemetry

mod corpus;
mod telemetry;

pub use corpus::CorpusWriter;
pub use telemetry::{print_summary, RunSummary, Stage, Telemetry};
