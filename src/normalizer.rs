//! Trial-record normalization
//!
//! This module cleans one participant's raw trial table into canonical form:
//! - `is_correct` recomputed from `response` vs `correct_response` (the
//!   logger-provided `correct_kb_response` flag is discarded)
//! - `trial_type` derived from the expected response side
//! - the "None" sentinel mapped to a real absence

use crate::types::{RawTrialRow, ResponseSide, TrialRecord, TrialType, NO_RESPONSE};

/// Normalizer for converting raw source rows into canonical trial records
pub struct TrialNormalizer;

impl TrialNormalizer {
    /// Normalize a participant's raw rows, preserving administration order.
    ///
    /// Never fails: an unexpected `correct_response` label simply makes the
    /// trial a NoGo trial (deliberate pass-through policy).
    pub fn normalize(rows: &[RawTrialRow]) -> Vec<TrialRecord> {
        rows.iter().map(normalize_row).collect()
    }
}

fn normalize_row(row: &RawTrialRow) -> TrialRecord {
    let expected = ResponseSide::parse(&row.correct_response);
    let response = parse_response(&row.response);

    // Recomputed from scratch as plain label equality; the source flag
    // guards nothing. On a stop trial "None" == "None" marks a correct stop.
    let is_correct = row.response == row.correct_response;

    let trial_type = if expected.is_some() {
        TrialType::Go
    } else {
        TrialType::NoGo
    };

    TrialRecord {
        expected,
        response,
        is_correct,
        response_time: row.response_time,
        stop_after: row.stop_after,
        trial_type,
    }
}

/// Map the logger's "None" sentinel to an omission
fn parse_response(label: &str) -> Option<String> {
    if label == NO_RESPONSE {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(correct_response: &str, response: &str, kb_flag: i64) -> RawTrialRow {
        RawTrialRow {
            correct_response: correct_response.to_string(),
            response: response.to_string(),
            correct_kb_response: kb_flag,
            response_time: 450.0,
            stop_after: 250.0,
        }
    }

    #[test]
    fn test_go_trial_correct_response() {
        let records = TrialNormalizer::normalize(&[raw("right", "right", 0)]);
        let record = &records[0];

        assert_eq!(record.trial_type, TrialType::Go);
        assert_eq!(record.expected, Some(ResponseSide::Right));
        // Recomputed despite the source flag saying 0
        assert!(record.is_correct);
        assert!(record.responded());
    }

    #[test]
    fn test_go_trial_wrong_side() {
        let records = TrialNormalizer::normalize(&[raw("left", "right", 1)]);
        assert_eq!(records[0].trial_type, TrialType::Go);
        assert!(!records[0].is_correct);
        assert!(records[0].responded());
    }

    #[test]
    fn test_go_omission() {
        let records = TrialNormalizer::normalize(&[raw("left", "None", 1)]);
        assert_eq!(records[0].trial_type, TrialType::Go);
        assert!(!records[0].is_correct);
        assert!(!records[0].responded());
    }

    #[test]
    fn test_nogo_withheld_is_correct() {
        let records = TrialNormalizer::normalize(&[raw("None", "None", 0)]);
        assert_eq!(records[0].trial_type, TrialType::NoGo);
        assert!(records[0].is_correct);
        assert!(!records[0].responded());
    }

    #[test]
    fn test_nogo_responded_is_incorrect() {
        let records = TrialNormalizer::normalize(&[raw("None", "left", 1)]);
        assert_eq!(records[0].trial_type, TrialType::NoGo);
        assert!(!records[0].is_correct);
        assert!(records[0].responded());
    }

    #[test]
    fn test_unexpected_label_maps_to_nogo() {
        // Unknown correct_response values pass through as NoGo trials
        let records = TrialNormalizer::normalize(&[raw("space", "space", 0)]);
        assert_eq!(records[0].trial_type, TrialType::NoGo);
        // Correctness stays plain label equality
        assert!(records[0].is_correct);
    }

    #[test]
    fn test_order_and_count_preserved() {
        let rows = vec![raw("right", "right", 1), raw("None", "None", 1)];
        let records = TrialNormalizer::normalize(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trial_type, TrialType::Go);
        assert_eq!(records[1].trial_type, TrialType::NoGo);
    }
}
