//! Trial classification
//!
//! Partitions a normalized trial table into the semantic categories every
//! statistic extractor consumes. Any category may be empty (a participant with
//! zero omissions, or zero unsuccessful stops); extractors treat an empty
//! category as a documented default, never as an error.

use crate::types::{TrialRecord, TrialType};

/// Named sub-tables of one participant's normalized trials.
///
/// Categories borrow from the dataset; nothing is copied or re-ordered.
#[derive(Debug)]
pub struct TrialClasses<'a> {
    /// All go trials
    pub go_all: Vec<&'a TrialRecord>,
    /// Go trials where a key was pressed
    pub go_responded: Vec<&'a TrialRecord>,
    /// Go trials with no response
    pub go_omitted: Vec<&'a TrialRecord>,
    /// Go trials answered incorrectly; includes omissions, so pure choice
    /// errors are `go_incorrect.len() - go_omitted.len()`
    pub go_incorrect: Vec<&'a TrialRecord>,
    /// All stop trials
    pub nogo_all: Vec<&'a TrialRecord>,
    /// Stop trials where a response slipped through (unsuccessful stop)
    pub nogo_responded: Vec<&'a TrialRecord>,
    /// Stop trials correctly withheld
    pub nogo_withheld: Vec<&'a TrialRecord>,
}

impl<'a> TrialClasses<'a> {
    /// Partition a normalized table into its trial categories
    pub fn partition(trials: &'a [TrialRecord]) -> Self {
        let mut classes = TrialClasses {
            go_all: Vec::new(),
            go_responded: Vec::new(),
            go_omitted: Vec::new(),
            go_incorrect: Vec::new(),
            nogo_all: Vec::new(),
            nogo_responded: Vec::new(),
            nogo_withheld: Vec::new(),
        };

        for trial in trials {
            match trial.trial_type {
                TrialType::Go => {
                    classes.go_all.push(trial);
                    if trial.responded() {
                        classes.go_responded.push(trial);
                    } else {
                        classes.go_omitted.push(trial);
                    }
                    if !trial.is_correct {
                        classes.go_incorrect.push(trial);
                    }
                }
                TrialType::NoGo => {
                    classes.nogo_all.push(trial);
                    if trial.responded() {
                        classes.nogo_responded.push(trial);
                    } else {
                        classes.nogo_withheld.push(trial);
                    }
                }
            }
        }

        classes
    }
}
