//! Core types for the SSRT pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw source rows, canonical trial records, per-participant results,
//! and the exportable result table.

use serde::{Deserialize, Serialize};

/// Value the task logger writes in the `response`/`correct_response` columns
/// when no key was pressed or no response was expected.
pub const NO_RESPONSE: &str = "None";

/// Response side expected (and hopefully given) on a go trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSide {
    Right,
    Left,
}

impl ResponseSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSide::Right => "right",
            ResponseSide::Left => "left",
        }
    }

    /// Parse a source-file side label. Anything that is not a known side
    /// (including "None") yields `None`, which downstream means NoGo.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "right" => Some(ResponseSide::Right),
            "left" => Some(ResponseSide::Left),
            _ => None,
        }
    }
}

/// Trial type derived from the expected response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialType {
    Go,
    NoGo,
}

impl TrialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialType::Go => "Go",
            TrialType::NoGo => "NoGo",
        }
    }
}

/// One raw row of a participant's source table, selected by header name.
///
/// `correct_kb_response` is the logger's own correctness flag; it is known to
/// be unreliable and is always recomputed by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrialRow {
    pub correct_response: String,
    pub response: String,
    pub correct_kb_response: i64,
    pub response_time: f64,
    pub stop_after: f64,
}

/// Canonical trial record produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Expected response side; `None` on stop trials
    pub expected: Option<ResponseSide>,
    /// Key actually pressed; `None` = omission
    pub response: Option<String>,
    /// Recomputed correctness: response equals expected response
    pub is_correct: bool,
    /// Response latency (ms); meaningful only when a response occurred
    pub response_time: f64,
    /// Stop-signal delay (ms); present on every row
    pub stop_after: f64,
    /// Derived from `expected`
    pub trial_type: TrialType,
}

impl TrialRecord {
    /// Whether any key was pressed on this trial
    pub fn responded(&self) -> bool {
        self.response.is_some()
    }
}

/// Trial-count configuration of the stop-signal protocol.
///
/// The defaults encode the reference protocol: 24 practice rows followed by
/// 150 go and 50 stop trials, with a 2000 ms response window (RTs above
/// 1990 ms are treated as timeouts by the integration estimators).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProtocol {
    pub go_trials: u32,
    pub nogo_trials: u32,
    /// Leading practice rows the loader discards
    pub practice_rows: usize,
    /// Go RTs above this cutoff (ms) are timeout artifacts
    pub timeout_cutoff_ms: f64,
}

impl Default for TaskProtocol {
    fn default() -> Self {
        Self {
            go_trials: 150,
            nogo_trials: 50,
            practice_rows: 24,
            timeout_cutoff_ms: 1990.0,
        }
    }
}

/// One participant's normalized trial table, in administration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDataset {
    pub id: u32,
    pub trials: Vec<TrialRecord>,
}

/// Diagnostic attached to a participant's result row.
///
/// Flags never abort the batch: the row is still produced, with the affected
/// statistics left undefined (or, for a race-model violation, reported as-is
/// but marked unreliable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityFlag {
    /// No responded go trials: meanRTgo and every SSRT are undefined
    UndefinedMeanGoRt,
    /// Every go trial was an omission: the omission adjustment divides by zero
    UndefinedAdjustedProbability,
    /// race_model is negative: SSRT estimates violate the race model
    RaceModelViolation,
}

impl ReliabilityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityFlag::UndefinedMeanGoRt => "undefined_mean_go_rt",
            ReliabilityFlag::UndefinedAdjustedProbability => "undefined_adjusted_probability",
            ReliabilityFlag::RaceModelViolation => "race_model_violation",
        }
    }
}

/// One row of the output table: every extractor output for one participant.
///
/// Statistics that can be undefined are `Option<f64>` and serialize as null
/// (empty cell in CSV) rather than a silent NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub id: u32,
    pub race_model: Option<f64>,
    pub p_respondsignal: f64,
    pub p_adj: Option<f64>,
    pub p_gomission: f64,
    pub p_choicerrors: f64,
    pub n_respondsignal: u32,
    pub n_gomission: u32,
    pub n_choicerrors: u32,
    #[serde(rename = "meanRTgo")]
    pub mean_rt_go: Option<f64>,
    #[serde(rename = "meanRTunsuccessfulNoGo")]
    pub mean_rt_unsuccessful_nogo: f64,
    #[serde(rename = "meanSSD")]
    pub mean_ssd: Option<f64>,
    pub ssrt_mm: Option<f64>,
    pub ssrt_im: Option<f64>,
    pub ssrt_im_adj: Option<f64>,
    /// Per-participant diagnostics (see [`ReliabilityFlag`])
    pub flags: Vec<ReliabilityFlag>,
}

/// The final artifact: one row per participant, input order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ParticipantResult>,
}

impl ResultTable {
    /// Output column order of the exported table (a trailing `flags`
    /// diagnostic column follows these in CSV exports).
    pub const COLUMNS: [&'static str; 15] = [
        "id",
        "race_model",
        "p_respondsignal",
        "p_adj",
        "p_gomission",
        "p_choicerrors",
        "n_respondsignal",
        "n_gomission",
        "n_choicerrors",
        "meanRTgo",
        "meanRTunsuccessfulNoGo",
        "meanSSD",
        "ssrt_mm",
        "ssrt_im",
        "ssrt_im_adj",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete exportable report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsrtReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub protocol: TaskProtocol,
    pub participants: Vec<ParticipantResult>,
}
