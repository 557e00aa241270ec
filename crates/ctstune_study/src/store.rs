//! A study persisted as a directory of JSON records.
//!
//! Layout under `<storage>/<study name>/`:
//!
//! - `study.json` - name and optimization direction
//! - `trials/<n>.json` - one record per trial
//!
//! Several worker processes may share a study directory. A worker claims
//! trial number `n` by creating `trials/<n>.json` with create-new semantics,
//! so two workers can never run the same trial number. Finished records are
//! replaced through a temporary file and a rename.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StudyError;
use crate::random::{draw_categorical, draw_int, RandomSampler};
use crate::sampler::{Optimizer, TrialSampler};

/// Name of the study metadata file.
const STUDY_FILE: &str = "study.json";

/// Subdirectory holding trial records.
const TRIALS_SUBDIR: &str = "trials";

/// Whether lower or higher objective values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lower is better.
    Minimize,
    /// Higher is better.
    Maximize,
}

impl Direction {
    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => f.write_str("minimize"),
            Direction::Maximize => f.write_str("maximize"),
        }
    }
}

/// Lifecycle state of a trial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialState {
    /// Claimed by a worker, not yet reported.
    Running,
    /// Reported with a finite objective value.
    Complete,
    /// Reported with a non-finite value: the configuration was unusable.
    Infeasible,
}

/// A sampled parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// An integer parameter.
    Int(i64),
    /// A categorical parameter.
    Categorical(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Categorical(v) => f.write_str(v),
        }
    }
}

/// The persisted state of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial number, unique within the study.
    pub number: u64,
    /// Lifecycle state.
    pub state: TrialState,
    /// Sampled parameters by name.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    /// Objective value; absent while running or when infeasible.
    #[serde(default)]
    pub value: Option<f64>,
    /// Wall-clock seconds between claim and report.
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

impl TrialRecord {
    /// Returns the objective value, `+inf` for infeasible trials.
    pub fn objective(&self) -> Option<f64> {
        match self.state {
            TrialState::Running => None,
            TrialState::Complete => self.value,
            TrialState::Infeasible => Some(f64::INFINITY),
        }
    }
}

/// Study metadata stored in `study.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StudyMeta {
    name: String,
    direction: Direction,
}

/// A study shared by worker processes through a directory.
#[derive(Debug)]
pub struct FileStudy {
    dir: PathBuf,
    meta: StudyMeta,
    sampler: RandomSampler,
}

impl FileStudy {
    /// Opens the study `name` under `storage`, creating it if needed.
    ///
    /// Reopening an existing study with a different direction is an error.
    pub fn load_or_create(
        storage: &Path,
        name: &str,
        direction: Direction,
    ) -> Result<Self, StudyError> {
        let dir = storage.join(name);
        let trials_dir = dir.join(TRIALS_SUBDIR);
        std::fs::create_dir_all(&trials_dir).map_err(|source| StudyError::Io {
            path: trials_dir.clone(),
            source,
        })?;

        let meta_path = dir.join(STUDY_FILE);
        let requested = StudyMeta {
            name: name.to_string(),
            direction,
        };
        let meta = match publish_meta(&dir, &meta_path, &requested) {
            Ok(()) => {
                info!(study = name, %direction, "created study");
                requested
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let stored = read_json::<StudyMeta>(&meta_path)?;
                if stored.direction != direction {
                    return Err(StudyError::DirectionMismatch {
                        name: name.to_string(),
                        stored: stored.direction,
                        requested: direction,
                    });
                }
                info!(study = name, "loaded existing study");
                stored
            }
            Err(source) => {
                return Err(StudyError::Io {
                    path: meta_path,
                    source,
                })
            }
        };

        Ok(Self {
            dir,
            meta,
            sampler: RandomSampler::default(),
        })
    }

    /// Opens an existing study without creating it.
    pub fn open(storage: &Path, name: &str) -> Result<Self, StudyError> {
        let dir = storage.join(name);
        let meta = read_json::<StudyMeta>(&dir.join(STUDY_FILE))?;
        Ok(Self {
            dir,
            meta,
            sampler: RandomSampler::default(),
        })
    }

    /// Replaces the parameter sampler.
    pub fn with_sampler(mut self, sampler: RandomSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Returns the study name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Returns the optimization direction.
    pub fn direction(&self) -> Direction {
        self.meta.direction
    }

    /// Returns the study directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn trials_dir(&self) -> PathBuf {
        self.dir.join(TRIALS_SUBDIR)
    }

    fn trial_path(&self, number: u64) -> PathBuf {
        self.trials_dir().join(format!("{number}.json"))
    }

    /// Returns the trial numbers that have been claimed, in ascending order.
    fn claimed_numbers(&self) -> Result<Vec<u64>, StudyError> {
        let dir = self.trials_dir();
        let entries = std::fs::read_dir(&dir).map_err(|source| StudyError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut numbers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StudyError::Io {
                path: dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(number) = stem.parse::<u64>() {
                numbers.push(number);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Reads all trial records, sorted by number.
    ///
    /// Records that cannot be parsed (for instance one being written by
    /// another worker at this very moment) are skipped.
    pub fn trials(&self) -> Result<Vec<TrialRecord>, StudyError> {
        let mut records = Vec::new();
        for number in self.claimed_numbers()? {
            match read_json::<TrialRecord>(&self.trial_path(number)) {
                Ok(record) => records.push(record),
                Err(e) => debug!(trial = number, error = %e, "skipping unreadable trial record"),
            }
        }
        Ok(records)
    }

    /// Returns the best finished trial, if any has a finite value.
    pub fn best_trial(&self) -> Result<Option<TrialRecord>, StudyError> {
        let direction = self.direction();
        let mut best: Option<TrialRecord> = None;
        for record in self.trials()? {
            let Some(value) = record.value.filter(|v| v.is_finite()) else {
                continue;
            };
            if record.state != TrialState::Complete {
                continue;
            }
            let better = match best.as_ref().and_then(|b| b.value) {
                Some(current) => direction.is_better(value, current),
                None => true,
            };
            if better {
                best = Some(record);
            }
        }
        Ok(best)
    }

    fn write_record(&self, record: &TrialRecord) -> Result<(), StudyError> {
        let path = self.trial_path(record.number);
        let tmp = self
            .trials_dir()
            .join(format!(".{}.json.tmp", record.number));
        let json = serde_json::to_string_pretty(record).map_err(|e| StudyError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&tmp, json).map_err(|source| StudyError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StudyError::Io { path, source })
    }
}

impl Optimizer for FileStudy {
    type Trial = FileTrial;

    fn ask(&mut self) -> Result<FileTrial, StudyError> {
        let mut number = self
            .claimed_numbers()?
            .last()
            .map_or(0, |last| last + 1);
        loop {
            let path = self.trial_path(number);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    let record = TrialRecord {
                        number,
                        state: TrialState::Running,
                        params: BTreeMap::new(),
                        value: None,
                        duration_secs: None,
                    };
                    serde_json::to_writer_pretty(file, &record).map_err(|e| {
                        StudyError::Serialization {
                            reason: e.to_string(),
                        }
                    })?;
                    debug!(study = %self.meta.name, trial = number, "claimed trial");
                    return Ok(FileTrial {
                        number,
                        rng: self.sampler.rng_for(number),
                        params: BTreeMap::new(),
                        started: Instant::now(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => number += 1,
                Err(source) => return Err(StudyError::Io { path, source }),
            }
        }
    }

    fn tell(&mut self, trial: FileTrial, value: f64) -> Result<(), StudyError> {
        let state = if value.is_finite() {
            TrialState::Complete
        } else {
            TrialState::Infeasible
        };
        let record = TrialRecord {
            number: trial.number,
            state,
            params: trial.params,
            value: value.is_finite().then_some(value),
            duration_secs: Some(trial.started.elapsed().as_secs_f64()),
        };
        self.write_record(&record)
    }
}

/// A trial claimed from a [`FileStudy`].
#[derive(Debug)]
pub struct FileTrial {
    number: u64,
    rng: StdRng,
    params: BTreeMap<String, ParamValue>,
    started: Instant,
}

impl FileTrial {
    /// Returns the parameters sampled so far.
    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }
}

impl TrialSampler for FileTrial {
    fn number(&self) -> u64 {
        self.number
    }

    fn sample_categorical(&mut self, name: &str, choices: &[String]) -> Result<String, StudyError> {
        if let Some(ParamValue::Categorical(v)) = self.params.get(name) {
            return Ok(v.clone());
        }
        let value = draw_categorical(&mut self.rng, name, choices)?;
        self.params
            .insert(name.to_string(), ParamValue::Categorical(value.clone()));
        Ok(value)
    }

    fn sample_int(&mut self, name: &str, low: i64, high: i64) -> Result<i64, StudyError> {
        if let Some(ParamValue::Int(v)) = self.params.get(name) {
            return Ok(*v);
        }
        let value = draw_int(&mut self.rng, name, low, high)?;
        self.params.insert(name.to_string(), ParamValue::Int(value));
        Ok(value)
    }
}

/// Writes `meta` to a private temporary file and links it into place.
///
/// The link fails with `AlreadyExists` if another worker published first, so
/// `study.json` is never observed half-written.
fn publish_meta(dir: &Path, meta_path: &Path, meta: &StudyMeta) -> std::io::Result<()> {
    static NEXT_TMP: AtomicU64 = AtomicU64::new(0);
    let tmp = dir.join(format!(
        ".{STUDY_FILE}.{}.{}.tmp",
        std::process::id(),
        NEXT_TMP.fetch_add(1, Ordering::Relaxed)
    ));
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
    std::fs::write(&tmp, json)?;
    let linked = std::fs::hard_link(&tmp, meta_path);
    // best effort
    let _ = std::fs::remove_file(&tmp);
    linked
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StudyError> {
    let content = std::fs::read_to_string(path).map_err(|source| StudyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| StudyError::Serialization {
        reason: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn study(dir: &TempDir) -> FileStudy {
        FileStudy::load_or_create(dir.path(), "cts", Direction::Minimize).unwrap()
    }

    #[test]
    fn create_then_reload() {
        let dir = TempDir::new().unwrap();
        let s = study(&dir);
        assert_eq!(s.name(), "cts");
        assert!(dir.path().join("cts").join(STUDY_FILE).is_file());
        let again = study(&dir);
        assert_eq!(again.direction(), Direction::Minimize);
    }

    #[test]
    fn direction_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        study(&dir);
        let err = FileStudy::load_or_create(dir.path(), "cts", Direction::Maximize).unwrap_err();
        assert!(matches!(err, StudyError::DirectionMismatch { .. }));
    }

    #[test]
    fn open_missing_study_errors() {
        let dir = TempDir::new().unwrap();
        let err = FileStudy::open(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, StudyError::Io { .. }));
    }

    #[test]
    fn trial_numbers_are_sequential() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        let t0 = s.ask().unwrap();
        let t1 = s.ask().unwrap();
        assert_eq!((t0.number(), t1.number()), (0, 1));
        s.tell(t0, 1.0).unwrap();
        s.tell(t1, 2.0).unwrap();
        assert_eq!(s.ask().unwrap().number(), 2);
    }

    #[test]
    fn two_handles_never_share_a_number() {
        let dir = TempDir::new().unwrap();
        let mut a = study(&dir);
        let mut b = study(&dir);
        let mut seen = HashSet::new();
        for _ in 0..5 {
            assert!(seen.insert(a.ask().unwrap().number()));
            assert!(seen.insert(b.ask().unwrap().number()));
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn workers_creating_a_study_together_all_succeed() {
        for _ in 0..20 {
            let dir = TempDir::new().unwrap();
            let storage = dir.path().to_path_buf();
            let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let storage = storage.clone();
                    let barrier = barrier.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        FileStudy::load_or_create(&storage, "cts", Direction::Minimize)
                            .map(|s| s.direction())
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), Direction::Minimize);
            }
            let leftovers: Vec<_> = std::fs::read_dir(storage.join("cts"))
                .unwrap()
                .map(|e| e.unwrap().file_name())
                .filter(|n| n.to_string_lossy().ends_with(".tmp"))
                .collect();
            assert!(leftovers.is_empty(), "{leftovers:?}");
        }
    }

    #[test]
    fn concurrent_workers_claim_distinct_numbers() {
        let dir = TempDir::new().unwrap();
        study(&dir);
        let storage = dir.path().to_path_buf();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    let mut s =
                        FileStudy::load_or_create(&storage, "cts", Direction::Minimize).unwrap();
                    (0..5).map(|_| s.ask().unwrap().number()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn tell_records_params_and_state() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir).with_sampler(RandomSampler::new(Some(3)));
        let mut t = s.ask().unwrap();
        let vt = t
            .sample_categorical("vt_type", &["LVT".to_string(), "SVT".to_string()])
            .unwrap();
        let min = t.sample_int("min_drive_strength", 1, 8).unwrap();
        s.tell(t, 0.125).unwrap();

        let mut t = s.ask().unwrap();
        t.sample_int("min_drive_strength", 1, 8).unwrap();
        s.tell(t, f64::INFINITY).unwrap();

        let records = s.trials().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, TrialState::Complete);
        assert_eq!(records[0].value, Some(0.125));
        assert_eq!(records[0].params["vt_type"], ParamValue::Categorical(vt));
        assert_eq!(records[0].params["min_drive_strength"], ParamValue::Int(min));
        assert!(records[0].duration_secs.is_some());
        assert_eq!(records[1].state, TrialState::Infeasible);
        assert_eq!(records[1].value, None);
        assert_eq!(records[1].objective(), Some(f64::INFINITY));
    }

    #[test]
    fn running_trials_are_listed() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        let _t = s.ask().unwrap();
        let records = s.trials().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, TrialState::Running);
        assert_eq!(records[0].objective(), None);
    }

    #[test]
    fn resampling_a_name_returns_first_value() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        let mut t = s.ask().unwrap();
        let first = t.sample_int("x", 0, 1_000_000).unwrap();
        assert_eq!(t.sample_int("x", 0, 1_000_000).unwrap(), first);
        assert_eq!(t.params().len(), 1);
    }

    #[test]
    fn best_trial_respects_direction() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        for v in [0.3, f64::INFINITY, 0.1, 0.2] {
            let t = s.ask().unwrap();
            s.tell(t, v).unwrap();
        }
        let best = s.best_trial().unwrap().unwrap();
        assert_eq!(best.number, 2);
        assert_eq!(best.value, Some(0.1));

        let mut max = FileStudy::load_or_create(dir.path(), "maxi", Direction::Maximize).unwrap();
        for v in [0.3, 0.9, 0.5] {
            let t = max.ask().unwrap();
            max.tell(t, v).unwrap();
        }
        assert_eq!(max.best_trial().unwrap().unwrap().value, Some(0.9));
    }

    #[test]
    fn best_trial_of_failed_study_is_none() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        let t = s.ask().unwrap();
        s.tell(t, f64::INFINITY).unwrap();
        assert!(s.best_trial().unwrap().is_none());
    }

    #[test]
    fn stray_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        let mut s = study(&dir);
        std::fs::write(s.dir().join(TRIALS_SUBDIR).join("notes.txt"), "hi").unwrap();
        std::fs::write(s.dir().join(TRIALS_SUBDIR).join("7.json"), "{ partial").unwrap();
        assert!(s.trials().unwrap().is_empty());
        assert_eq!(s.ask().unwrap().number(), 8);
    }
}
