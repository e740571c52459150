//! Result encoding
//!
//! Renders the result table for export: a JSON report payload with producer
//! and provenance metadata, or a flat CSV table with the fixed column order.

use chrono::Utc;
use uuid::Uuid;

use crate::error::SsrtError;
use crate::types::{ParticipantResult, ReportProducer, ResultTable, SsrtReport, TaskProtocol};
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for producing exportable reports from a result table
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Build the report payload for a result table
    pub fn encode(&self, table: &ResultTable, protocol: &TaskProtocol) -> SsrtReport {
        SsrtReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            protocol: protocol.clone(),
            participants: table.rows.clone(),
        }
    }

    /// Encode the report payload to a JSON string
    pub fn encode_to_json(
        &self,
        table: &ResultTable,
        protocol: &TaskProtocol,
    ) -> Result<String, SsrtError> {
        serde_json::to_string_pretty(&self.encode(table, protocol)).map_err(SsrtError::Json)
    }

    /// Render the table as CSV: the fixed 15 output columns in order, plus a
    /// trailing `flags` diagnostic column. Undefined statistics are empty
    /// cells, never NaN text.
    pub fn encode_to_csv(&self, table: &ResultTable) -> Result<String, SsrtError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<&str> = ResultTable::COLUMNS.to_vec();
        header.push("flags");
        writer
            .write_record(&header)
            .map_err(|e| SsrtError::Encoding(e.to_string()))?;

        for row in &table.rows {
            writer
                .write_record(csv_record(row))
                .map_err(|e| SsrtError::Encoding(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| SsrtError::Encoding(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| SsrtError::Encoding(e.to_string()))
    }
}

fn csv_record(row: &ParticipantResult) -> Vec<String> {
    let flags = row
        .flags
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(";");

    vec![
        row.id.to_string(),
        float_cell(row.race_model),
        row.p_respondsignal.to_string(),
        float_cell(row.p_adj),
        row.p_gomission.to_string(),
        row.p_choicerrors.to_string(),
        row.n_respondsignal.to_string(),
        row.n_gomission.to_string(),
        row.n_choicerrors.to_string(),
        float_cell(row.mean_rt_go),
        row.mean_rt_unsuccessful_nogo.to_string(),
        float_cell(row.mean_ssd),
        float_cell(row.ssrt_mm),
        float_cell(row.ssrt_im),
        float_cell(row.ssrt_im_adj),
        flags,
    ]
}

fn float_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
