//! Stopsig - batch compute engine for stop-signal task data
//!
//! Stopsig derives Stop-Signal Reaction Time (SSRT) estimates from trial-level
//! behavioral records through a deterministic per-participant pipeline:
//! loading → trial normalization → classification → statistic extraction →
//! aggregation into one exportable table.
//!
//! Per participant it reports go-trial latencies, omission and choice-error
//! rates, stop-signal delays, the race-model check, and three SSRT estimators
//! (Mean Method, Integration Method, Integration Method with omission
//! adjustment). Degenerate participants are flagged, never dropped.

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod extractors;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod types;

pub use classifier::TrialClasses;
pub use encoder::ReportEncoder;
pub use error::SsrtError;
pub use loader::{load_dir, load_file};
pub use normalizer::TrialNormalizer;
pub use pipeline::{datasets_to_table, SsrtProcessor};
pub use types::{
    ParticipantDataset, ParticipantResult, RawTrialRow, ReliabilityFlag, ResultTable,
    TaskProtocol, TrialRecord,
};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "stopsig";
