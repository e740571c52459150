//! Statistic extractors
//!
//! Independent pure functions, each consuming the classified trial categories
//! for one participant and producing one named statistic: omission and
//! choice-error rates, go/stop latencies, respond-probability, the race-model
//! check, and the three SSRT estimators.
//!
//! Empty-category policy (applies throughout): a missing category yields the
//! documented default, never an error. The only statistics that can be
//! genuinely undefined are meanRTgo (no responded go trials) and the adjusted
//! respond-probability (every go trial omitted); both are reported as `None`
//! and flagged by the pipeline.

use crate::classifier::TrialClasses;
use crate::types::{TaskProtocol, TrialRecord};

/// Go-omission count and probability: trials where no key was pressed
/// although a response was expected. Zero if the category is empty.
pub fn go_omissions(classes: &TrialClasses, protocol: &TaskProtocol) -> (u32, f64) {
    let n = classes.go_omitted.len() as u32;
    (n, f64::from(n) / f64::from(protocol.go_trials))
}

/// Choice-error count and probability: go trials answered on the wrong side.
///
/// The incorrect category includes omissions, so they are subtracted to leave
/// pure wrong-side presses. Zero if no go trial was incorrect.
pub fn choice_errors(classes: &TrialClasses, protocol: &TaskProtocol) -> (u32, f64) {
    let n = (classes.go_incorrect.len() - classes.go_omitted.len()) as u32;
    (n, f64::from(n) / f64::from(protocol.go_trials))
}

/// Mean RT over responded go trials.
///
/// `None` when the participant never responded on a go trial; every SSRT
/// estimate depends on this value, so the pipeline flags that row.
pub fn mean_go_rt(classes: &TrialClasses) -> Option<f64> {
    mean_rt(&classes.go_responded)
}

/// Mean stop-signal delay over ALL trials (not just stop trials; the delay
/// column is present on every row in this design). `None` for an empty table.
pub fn mean_ssd(trials: &[TrialRecord]) -> Option<f64> {
    if trials.is_empty() {
        return None;
    }
    let sum: f64 = trials.iter().map(|t| t.stop_after).sum();
    Some(sum / trials.len() as f64)
}

/// Mean RT of responses that slipped through on stop trials; 0 when the
/// participant stopped successfully every time.
pub fn mean_unsuccessful_nogo_rt(classes: &TrialClasses) -> f64 {
    mean_rt(&classes.nogo_responded).unwrap_or(0.0)
}

/// Respond-to-signal count and probability: stop trials where a response
/// occurred, out of the protocol's stop-trial count. A participant who
/// withheld on every stop trial scores zero.
pub fn respond_signal(classes: &TrialClasses, protocol: &TaskProtocol) -> (u32, f64) {
    let withheld = classes.nogo_withheld.len() as u32;
    let n = protocol.nogo_trials.saturating_sub(withheld);
    (n, f64::from(n) / f64::from(protocol.nogo_trials))
}

/// Race-model check: mean go RT minus mean unsuccessful-stop RT.
///
/// The race model requires signal-respond RTs to be faster than go RTs, so a
/// negative value invalidates the SSRT estimates for that participant. Falls
/// back to the go mean alone when no stop trial was responded to.
pub fn race_model(mean_go_rt: f64, classes: &TrialClasses) -> f64 {
    match mean_rt(&classes.nogo_responded) {
        Some(mean_nogo_rt) => mean_go_rt - mean_nogo_rt,
        None => mean_go_rt,
    }
}

/// SSRT by the Mean Method: mean go RT minus mean SSD
pub fn ssrt_mean_method(mean_go_rt: f64, mean_ssd: f64) -> f64 {
    mean_go_rt - mean_ssd
}

/// Go RT distribution used by the Integration Method, sorted ascending.
///
/// Timeouts (RTs above the protocol cutoff, which is where omissions land in
/// the source data) are replaced by the slowest finite responded-go RT,
/// approximating "omissions are infinitely slow" with the observed maximum.
pub fn go_rt_distribution(classes: &TrialClasses, protocol: &TaskProtocol) -> Vec<f64> {
    let max_responded_rt = classes
        .go_responded
        .iter()
        .map(|t| t.response_time)
        .filter(|rt| rt.is_finite())
        .fold(None, |acc: Option<f64>, rt| {
            Some(acc.map_or(rt, |max: f64| max.max(rt)))
        });

    let mut rts: Vec<f64> = classes
        .go_all
        .iter()
        .map(|t| match max_responded_rt {
            Some(max_rt) if t.response_time > protocol.timeout_cutoff_ms => max_rt,
            _ => t.response_time,
        })
        .collect();
    rts.sort_by(|a, b| a.total_cmp(b));
    rts
}

/// SSRT by the Integration Method: the RT at the respond-probability-th
/// quantile of the go distribution, minus mean SSD.
///
/// The rank is `round(p × go_trials)` clamped into `[1, |distribution|]`; a
/// zero probability is floored to the first order statistic. `None` only when
/// the participant has no go trials at all.
pub fn integration_ssrt(
    distribution: &[f64],
    respond_probability: f64,
    protocol: &TaskProtocol,
    mean_ssd: f64,
) -> Option<f64> {
    if distribution.is_empty() {
        return None;
    }
    let rank = (respond_probability * f64::from(protocol.go_trials)).round() as i64;
    let rank = rank.clamp(1, distribution.len() as i64) as usize;
    Some(distribution[rank - 1] - mean_ssd)
}

/// Respond-probability adjusted for go omissions: an omitted go trial hides a
/// response that would have happened, so the raw probability is rescaled by
/// the responding fraction. Undefined when every go trial was omitted.
pub fn adjusted_respond_probability(
    respond_probability: f64,
    omission_probability: f64,
) -> Option<f64> {
    if omission_probability == 0.0 {
        Some(respond_probability)
    } else if omission_probability >= 1.0 {
        // Denominator hits zero; must be flagged, not divided
        None
    } else {
        Some(respond_probability / (1.0 - omission_probability))
    }
}

fn mean_rt(trials: &[&TrialRecord]) -> Option<f64> {
    if trials.is_empty() {
        return None;
    }
    let sum: f64 = trials.iter().map(|t| t.response_time).sum();
    Some(sum / trials.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResponseSide, TrialType};

    fn go(rt: f64) -> TrialRecord {
        TrialRecord {
            expected: Some(ResponseSide::Right),
            response: Some("right".to_string()),
            is_correct: true,
            response_time: rt,
            stop_after: 250.0,
            trial_type: TrialType::Go,
        }
    }

    fn go_wrong_side(rt: f64) -> TrialRecord {
        TrialRecord {
            response: Some("left".to_string()),
            is_correct: false,
            ..go(rt)
        }
    }

    fn go_omission() -> TrialRecord {
        TrialRecord {
            response: None,
            is_correct: false,
            response_time: 2000.0,
            ..go(0.0)
        }
    }

    fn stop_withheld() -> TrialRecord {
        TrialRecord {
            expected: None,
            response: None,
            is_correct: true,
            response_time: 0.0,
            stop_after: 250.0,
            trial_type: TrialType::NoGo,
        }
    }

    fn stop_responded(rt: f64) -> TrialRecord {
        TrialRecord {
            response: Some("right".to_string()),
            is_correct: false,
            response_time: rt,
            ..stop_withheld()
        }
    }

    fn classes(trials: &[TrialRecord]) -> TrialClasses<'_> {
        TrialClasses::partition(trials)
    }

    #[test]
    fn test_omission_and_choice_error_rates() {
        let trials = vec![
            go(400.0),
            go_wrong_side(420.0),
            go_omission(),
            go_omission(),
        ];
        let protocol = TaskProtocol::default();
        let c = classes(&trials);

        let (n_omit, p_omit) = go_omissions(&c, &protocol);
        assert_eq!(n_omit, 2);
        assert!((p_omit - 2.0 / 150.0).abs() < 1e-12);

        // Incorrect = 3 (two omissions + one wrong side); pure errors = 1
        let (n_err, p_err) = choice_errors(&c, &protocol);
        assert_eq!(n_err, 1);
        assert!((p_err - 1.0 / 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_rates_default_to_zero_when_categories_empty() {
        let trials = vec![go(400.0), stop_withheld()];
        let protocol = TaskProtocol::default();
        let c = classes(&trials);

        assert_eq!(go_omissions(&c, &protocol), (0, 0.0));
        assert_eq!(choice_errors(&c, &protocol), (0, 0.0));
        assert_eq!(mean_unsuccessful_nogo_rt(&c), 0.0);
    }

    #[test]
    fn test_mean_go_rt_undefined_without_responses() {
        let trials = vec![go_omission(), stop_withheld()];
        assert_eq!(mean_go_rt(&classes(&trials)), None);
    }

    #[test]
    fn test_mean_ssd_covers_all_trials() {
        let mut trials = vec![go(400.0), stop_withheld()];
        trials[0].stop_after = 100.0;
        trials[1].stop_after = 300.0;
        assert_eq!(mean_ssd(&trials), Some(200.0));
        assert_eq!(mean_ssd(&[]), None);
    }

    #[test]
    fn test_respond_signal_counts() {
        let protocol = TaskProtocol::default();

        let trials: Vec<TrialRecord> = (0..40)
            .map(|_| stop_withheld())
            .chain((0..10).map(|_| stop_responded(380.0)))
            .collect();
        let (n, p) = respond_signal(&classes(&trials), &protocol);
        assert_eq!(n, 10);
        assert!((p - 0.2).abs() < 1e-12);

        // Perfect stopper: n clamps at zero, never underflows
        let trials: Vec<TrialRecord> = (0..50).map(|_| stop_withheld()).collect();
        assert_eq!(respond_signal(&classes(&trials), &protocol), (0, 0.0));
    }

    #[test]
    fn test_race_model_and_fallback() {
        let trials = vec![go(500.0), stop_responded(420.0)];
        assert!((race_model(500.0, &classes(&trials)) - 80.0).abs() < 1e-12);

        // No unsuccessful stops: falls back to the go mean alone
        let trials = vec![go(500.0), stop_withheld()];
        assert_eq!(race_model(500.0, &classes(&trials)), 500.0);

        // Violation shows up as a negative value, still computed
        let trials = vec![go(400.0), stop_responded(450.0)];
        assert!(race_model(400.0, &classes(&trials)) < 0.0);
    }

    #[test]
    fn test_ssrt_mean_method_exact() {
        assert_eq!(ssrt_mean_method(500.0, 250.0), 250.0);
        assert_eq!(ssrt_mean_method(432.5, 180.25), 432.5 - 180.25);
    }

    #[test]
    fn test_go_rt_distribution_replaces_timeouts() {
        let protocol = TaskProtocol::default();
        let trials = vec![go(300.0), go(700.0), go_omission()];
        let dist = go_rt_distribution(&classes(&trials), &protocol);

        // The 2000 ms timeout collapses onto the slowest real response
        assert_eq!(dist, vec![300.0, 700.0, 700.0]);
    }

    #[test]
    fn test_go_rt_distribution_sorted() {
        let protocol = TaskProtocol::default();
        let trials = vec![go(650.0), go(300.0), go(512.0)];
        let dist = go_rt_distribution(&classes(&trials), &protocol);
        assert_eq!(dist, vec![300.0, 512.0, 650.0]);
    }

    #[test]
    fn test_integration_rank_selection() {
        // 150 distinct ascending RTs 1..=150 and p = 0.5 selects rank 75
        let protocol = TaskProtocol::default();
        let distribution: Vec<f64> = (1..=150).map(f64::from).collect();

        let ssrt = integration_ssrt(&distribution, 0.5, &protocol, 10.0).unwrap();
        assert!((ssrt - 65.0).abs() < 1e-12); // 75 - 10
    }

    #[test]
    fn test_integration_rank_clamping() {
        let protocol = TaskProtocol::default();
        let distribution = vec![100.0, 200.0, 300.0];

        // p = 0 would give rank 0; floored to the first order statistic
        assert_eq!(
            integration_ssrt(&distribution, 0.0, &protocol, 0.0),
            Some(100.0)
        );
        // A huge probability clamps to the last order statistic
        assert_eq!(
            integration_ssrt(&distribution, 1.0, &protocol, 0.0),
            Some(300.0)
        );
        // No go trials at all: undefined
        assert_eq!(integration_ssrt(&[], 0.5, &protocol, 0.0), None);
    }

    #[test]
    fn test_adjusted_respond_probability() {
        // No omissions: unchanged
        assert_eq!(adjusted_respond_probability(0.2, 0.0), Some(0.2));

        // 10% omissions rescale the raw probability upward
        let p = adjusted_respond_probability(0.2, 0.1).unwrap();
        assert!((p - 0.2 / 0.9).abs() < 1e-12);

        // All go trials omitted: undefined, not a division by zero
        assert_eq!(adjusted_respond_probability(0.2, 1.0), None);
    }
}
