//! Participant data loading
//!
//! Reads a directory of per-participant CSV exports from the task logger and
//! produces normalized datasets:
//! - files are taken in natural ("dictionary") filename order, so `2-foo.csv`
//!   sorts before `10-foo.csv`
//! - the participant id is the integer filename prefix before the first `-`
//! - the leading practice rows are discarded
//! - columns are selected by header name, never by position

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SsrtError;
use crate::normalizer::TrialNormalizer;
use crate::types::{ParticipantDataset, RawTrialRow, TaskProtocol};

/// Load every participant CSV in a directory, in natural filename order
pub fn load_dir(dir: &Path, protocol: &TaskProtocol) -> Result<Vec<ParticipantDataset>, SsrtError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| SsrtError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("csv"))
        .collect();

    if paths.is_empty() {
        return Err(SsrtError::EmptyInputDir(dir.to_path_buf()));
    }

    paths.sort_by(|a, b| natural_cmp(&file_name_str(a), &file_name_str(b)));

    paths
        .iter()
        .map(|path| load_file(path, protocol))
        .collect()
}

/// Load and normalize a single participant CSV
pub fn load_file(path: &Path, protocol: &TaskProtocol) -> Result<ParticipantDataset, SsrtError> {
    let id = participant_id(&file_name_str(path))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| SsrtError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows: Vec<RawTrialRow> = Vec::new();
    for record in reader.deserialize::<RawTrialRow>() {
        rows.push(record.map_err(|source| SsrtError::Csv {
            path: path.to_path_buf(),
            source,
        })?);
    }

    // The first rows of every export are the practice block
    let trials = if rows.len() > protocol.practice_rows {
        &rows[protocol.practice_rows..]
    } else {
        &[]
    };

    Ok(ParticipantDataset {
        id,
        trials: TrialNormalizer::normalize(trials),
    })
}

/// Parse the participant id from a file name like `12-stop-signal.csv`
fn participant_id(file_name: &str) -> Result<u32, SsrtError> {
    file_name
        .split('-')
        .next()
        .and_then(|prefix| prefix.trim().parse().ok())
        .ok_or_else(|| SsrtError::BadFileName(file_name.to_string()))
}

fn file_name_str(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Natural string comparison: digit runs compare as numbers, everything else
/// byte-wise. Mirrors the dictionary sort the original analysis relied on to
/// keep participant files in numeric order.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.as_bytes();
    let mut right = b.as_bytes();

    loop {
        match (left.first(), right.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&lc), Some(&rc)) => {
                if lc.is_ascii_digit() && rc.is_ascii_digit() {
                    let (lnum, lrest) = take_number(left);
                    let (rnum, rrest) = take_number(right);
                    match lnum.cmp(&rnum) {
                        Ordering::Equal => {
                            left = lrest;
                            right = rrest;
                        }
                        other => return other,
                    }
                } else {
                    match lc.cmp(&rc) {
                        Ordering::Equal => {
                            left = &left[1..];
                            right = &right[1..];
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(bytes: &[u8]) -> (u64, &[u8]) {
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    let value = bytes[..end]
        .iter()
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
    (value, &bytes[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "correct_kb_response,response,correct_response,response_time,stop_after";

    fn write_participant_csv(dir: &Path, name: &str, data_rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        // Practice block the loader must skip
        for _ in 0..24 {
            writeln!(file, "1,right,right,350.0,0.0").unwrap();
        }
        for row in data_rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stopsig-loader-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_natural_cmp_orders_digit_runs_numerically() {
        let mut names = vec!["10-a.csv", "2-a.csv", "1-a.csv", "21-a.csv"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["1-a.csv", "2-a.csv", "10-a.csv", "21-a.csv"]);
    }

    #[test]
    fn test_participant_id_from_prefix() {
        assert_eq!(participant_id("12-stop-signal.csv").unwrap(), 12);
        assert_eq!(participant_id("3-x.csv").unwrap(), 3);
        assert!(participant_id("participant.csv").is_err());
    }

    #[test]
    fn test_load_file_skips_practice_and_normalizes() {
        let dir = temp_dir("single");
        let path = write_participant_csv(
            &dir,
            "5-task.csv",
            &[
                "0,right,right,420.5,0.0",
                "1,None,None,0.0,275.0",
            ],
        );

        let dataset = load_file(&path, &TaskProtocol::default()).unwrap();
        assert_eq!(dataset.id, 5);
        // 24 practice rows dropped, 2 real trials kept
        assert_eq!(dataset.trials.len(), 2);
        assert!(dataset.trials[0].is_correct);
        assert_eq!(dataset.trials[0].response_time, 420.5);
        assert!(!dataset.trials[1].responded());
        assert_eq!(dataset.trials[1].stop_after, 275.0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_dir_natural_order_and_csv_filter() {
        let dir = temp_dir("batch");
        write_participant_csv(&dir, "10-task.csv", &["1,right,right,400.0,0.0"]);
        write_participant_csv(&dir, "2-task.csv", &["1,left,left,410.0,0.0"]);
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let datasets = load_dir(&dir, &TaskProtocol::default()).unwrap();
        let ids: Vec<u32> = datasets.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 10]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_dir_without_csvs_is_an_error() {
        let dir = temp_dir("empty");
        assert!(matches!(
            load_dir(&dir, &TaskProtocol::default()),
            Err(SsrtError::EmptyInputDir(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_short_file_yields_empty_dataset() {
        let dir = temp_dir("short");
        let path = dir.join("9-task.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "1,right,right,400.0,0.0").unwrap();

        // Fewer rows than the practice block: nothing left to analyze
        let dataset = load_file(&path, &TaskProtocol::default()).unwrap();
        assert_eq!(dataset.id, 9);
        assert!(dataset.trials.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
