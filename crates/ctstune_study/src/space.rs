//! The CTS cell-selection search space.

use ctstune_common::TrialConfig;

use crate::error::StudyError;
use crate::sampler::TrialSampler;

/// Parameter name of the voltage-threshold class.
pub const VT_PARAM: &str = "vt_type";

/// Parameter name of the minimum drive strength.
pub const MIN_DRIVE_PARAM: &str = "min_drive_strength";

/// Parameter name of the maximum drive strength.
pub const MAX_DRIVE_PARAM: &str = "max_drive_strength";

/// Bounds of the three sampled parameters.
///
/// The maximum drive strength is sampled from `[min, max_drive_high]` after
/// the minimum is known, so every sampled window is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpace {
    /// Voltage-threshold classes to choose from.
    pub vt_classes: Vec<String>,
    /// Lower bound of the minimum drive strength.
    pub min_drive_low: u32,
    /// Upper bound of the minimum drive strength.
    pub min_drive_high: u32,
    /// Upper bound of the maximum drive strength.
    pub max_drive_high: u32,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            vt_classes: ["ULVTLL", "LVTLL", "LVT", "SVT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_drive_low: 1,
            min_drive_high: 8,
            max_drive_high: 16,
        }
    }
}

impl SearchSpace {
    /// Samples a trial configuration through `trial`.
    pub fn sample<T: TrialSampler>(&self, trial: &mut T) -> Result<TrialConfig, StudyError> {
        let vt_class = trial.sample_categorical(VT_PARAM, &self.vt_classes)?;
        let min = trial.sample_int(
            MIN_DRIVE_PARAM,
            i64::from(self.min_drive_low),
            i64::from(self.min_drive_high),
        )?;
        let max = trial.sample_int(MAX_DRIVE_PARAM, min, i64::from(self.max_drive_high))?;
        Ok(TrialConfig {
            number: trial.number(),
            vt_class,
            min_drive: to_drive(MIN_DRIVE_PARAM, min)?,
            max_drive: to_drive(MAX_DRIVE_PARAM, max)?,
        })
    }
}

fn to_drive(name: &str, value: i64) -> Result<u32, StudyError> {
    u32::try_from(value).map_err(|_| StudyError::InvalidRange {
        name: name.to_string(),
        low: value,
        high: value,
    })
}
