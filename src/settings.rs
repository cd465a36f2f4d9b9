use std::{fs, io::BufReader, path::Path};

use better_default::Default;
use getset::{CopyGetters, Setters};
use serde::{Deserialize, Serialize};

/// Returns `T` or [SettingsError]
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The "diminishing quota" used when joining translations into a `trans_list`.
///
/// The first accepted translation needs `threshold_start`,
/// every accepted translation raises the bar by `threshold_step`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AggregationPolicy {
    #[default(1.0)]
    pub threshold_start: f64,
    #[default(5.0)]
    pub threshold_step: f64,
}

/// Weights of the confirmation signals that make up a translation's score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringWeights {
    /// Translation found directly in the source language's entry.
    #[default(10.0)]
    pub direct: f64,
    /// The target language translates the target form back to the headword.
    #[default(20.0)]
    pub reverse: f64,
    /// Added once per third language that links headword and target form.
    #[default(5.0)]
    pub triangulation: f64,
    /// Third languages needed before a translation without a direct
    /// entry is inferred at all.
    #[default(2)]
    pub min_inferred_paths: usize,
}

/// How an entry attribute with several different values is reduced to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeConflictPolicy {
    /// Keep the value only if all rows agree.
    #[default]
    NullOnConflict,
    /// Keep the first value seen.
    FirstDistinct,
    /// Keep the lexicographically smallest value.
    Smallest,
}

/// Tunables of the translation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default, CopyGetters, Setters)]
#[serde(default)]
pub struct PipelineOptions {
    #[getset(get_copy = "pub", set = "pub")]
    aggregation: AggregationPolicy,
    #[getset(get_copy = "pub", set = "pub")]
    scoring: ScoringWeights,
    /// Minimum score of a "good" translation.
    #[default(20.0)]
    #[getset(get_copy = "pub", set = "pub")]
    good_score: f64,
    /// Importance used for target forms missing from the target importance table.
    #[default(0.001)]
    #[getset(get_copy = "pub", set = "pub")]
    importance_floor: f64,
    /// Number of top scores averaged to normalize importance.
    #[default(10_000)]
    #[getset(get_copy = "pub", set = "pub")]
    importance_top_n: usize,
    #[getset(get_copy = "pub", set = "pub")]
    gender_policy: AttributeConflictPolicy,
    #[default(AttributeConflictPolicy::Smallest)]
    #[getset(get_copy = "pub", set = "pub")]
    pos_policy: AttributeConflictPolicy,
}

impl PipelineOptions {
    /// Loads options from a json file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let file = fs::File::open(path.as_ref())?;
        let options: PipelineOptions = serde_json::from_reader(BufReader::new(file))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let AggregationPolicy {
            threshold_start,
            threshold_step,
        } = self.aggregation;
        require_finite("aggregation.threshold_start", threshold_start)?;
        require_positive("aggregation.threshold_step", threshold_step)?;
        require_finite("good_score", self.good_score)?;
        require_positive("importance_floor", self.importance_floor)?;
        if self.importance_top_n == 0 {
            return Err(SettingsError::Invalid {
                field: "importance_top_n",
                reason: "must be at least 1".into(),
            });
        }
        let ScoringWeights {
            direct,
            reverse,
            triangulation,
            ..
        } = self.scoring;
        require_non_negative("scoring.direct", direct)?;
        require_non_negative("scoring.reverse", reverse)?;
        require_non_negative("scoring.triangulation", triangulation)?;
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> SettingsResult<()> {
    if !value.is_finite() {
        return Err(SettingsError::Invalid {
            field,
            reason: format!("{value} is not a finite number"),
        });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> SettingsResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(SettingsError::Invalid {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> SettingsResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(SettingsError::Invalid {
            field,
            reason: format!("{value} must be greater than 0"),
        });
    }
    Ok(())
}
