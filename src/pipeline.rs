//! Pipeline orchestration
//!
//! This module provides the public API of the SSRT engine: it runs the full
//! extractor set for each participant and assembles the result table.
//!
//! A participant whose statistics cannot all be computed (no responded go
//! trials, or every go trial omitted) still produces a row: the affected
//! values are `None` and the row carries the matching reliability flags. The
//! batch never aborts on a single bad participant.

use crate::classifier::TrialClasses;
use crate::extractors;
use crate::types::{
    ParticipantDataset, ParticipantResult, ReliabilityFlag, ResultTable, TaskProtocol,
};

/// Processor configured with a task protocol.
///
/// Stateless across participants: each dataset is classified and measured
/// independently, in input order.
pub struct SsrtProcessor {
    protocol: TaskProtocol,
}

impl Default for SsrtProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SsrtProcessor {
    /// Create a processor for the reference protocol (150 go / 50 stop trials)
    pub fn new() -> Self {
        Self {
            protocol: TaskProtocol::default(),
        }
    }

    /// Create a processor for a custom trial-count configuration
    pub fn with_protocol(protocol: TaskProtocol) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> &TaskProtocol {
        &self.protocol
    }

    /// Run every statistic extractor for one participant.
    ///
    /// Stages:
    /// 1. TrialClasses - partition the normalized table into categories
    /// 2. extractors - counts, probabilities, latencies
    /// 3. SSRT estimators - Mean Method and both Integration Method variants
    /// 4. diagnostics - reliability flags for undefined or suspect values
    pub fn process_participant(&self, dataset: &ParticipantDataset) -> ParticipantResult {
        let protocol = &self.protocol;
        let classes = TrialClasses::partition(&dataset.trials);
        let mut flags = Vec::new();

        let (n_gomission, p_gomission) = extractors::go_omissions(&classes, protocol);
        let (n_choicerrors, p_choicerrors) = extractors::choice_errors(&classes, protocol);
        let (n_respondsignal, p_respondsignal) = extractors::respond_signal(&classes, protocol);

        let mean_ssd = extractors::mean_ssd(&dataset.trials);
        let mean_rt_go = extractors::mean_go_rt(&classes);
        let mean_rt_unsuccessful_nogo = extractors::mean_unsuccessful_nogo_rt(&classes);

        if mean_rt_go.is_none() {
            flags.push(ReliabilityFlag::UndefinedMeanGoRt);
        }

        let race_model = mean_rt_go.map(|rt| extractors::race_model(rt, &classes));
        if race_model.is_some_and(|v| v < 0.0) {
            flags.push(ReliabilityFlag::RaceModelViolation);
        }

        let p_adj = extractors::adjusted_respond_probability(p_respondsignal, p_gomission);
        if p_adj.is_none() {
            flags.push(ReliabilityFlag::UndefinedAdjustedProbability);
        }

        // Every SSRT estimate needs a defined go latency basis
        let (ssrt_mm, ssrt_im, ssrt_im_adj) = match (mean_rt_go, mean_ssd) {
            (Some(go_rt), Some(ssd)) => {
                let ssrt_mm = extractors::ssrt_mean_method(go_rt, ssd);
                let distribution = extractors::go_rt_distribution(&classes, protocol);
                let ssrt_im =
                    extractors::integration_ssrt(&distribution, p_respondsignal, protocol, ssd);
                let ssrt_im_adj = p_adj.and_then(|p| {
                    extractors::integration_ssrt(&distribution, p, protocol, ssd)
                });

                (Some(ssrt_mm), ssrt_im, ssrt_im_adj)
            }
            _ => (None, None, None),
        };

        ParticipantResult {
            id: dataset.id,
            race_model,
            p_respondsignal,
            p_adj,
            p_gomission,
            p_choicerrors,
            n_respondsignal,
            n_gomission,
            n_choicerrors,
            mean_rt_go,
            mean_rt_unsuccessful_nogo,
            mean_ssd,
            ssrt_mm,
            ssrt_im,
            ssrt_im_adj,
            flags,
        }
    }

    /// Process every participant and assemble the result table, one row per
    /// dataset, in the order the datasets were given.
    pub fn process_batch(&self, datasets: &[ParticipantDataset]) -> ResultTable {
        ResultTable {
            rows: datasets
                .iter()
                .map(|dataset| self.process_participant(dataset))
                .collect(),
        }
    }
}

/// Compute a result table for the reference protocol (stateless, one-shot)
pub fn datasets_to_table(datasets: &[ParticipantDataset]) -> ResultTable {
    SsrtProcessor::new().process_batch(datasets)
}
