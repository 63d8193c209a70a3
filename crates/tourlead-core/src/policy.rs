use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::lexicon::check_unit;

/// Weights of the subscription-probability formula.
///
/// `probability = (shopping * shopping_weight + risk * risk_weight
///   + min(stay, stay_saturation_days) / stay_saturation_days * stay_weight) * 100`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub shopping_weight: f64,
    pub risk_weight: f64,
    pub stay_weight: f64,
    pub stay_saturation_days: u32,
    pub high_intent_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            shopping_weight: 0.5,
            risk_weight: 0.4,
            stay_weight: 0.1,
            stay_saturation_days: 30,
            high_intent_threshold: 70.0,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), InputError> {
        check_unit("shopping_weight", self.shopping_weight)?;
        check_unit("risk_weight", self.risk_weight)?;
        check_unit("stay_weight", self.stay_weight)?;
        let total = self.shopping_weight + self.risk_weight + self.stay_weight;
        // small slack so 0.5 + 0.4 + 0.1 passes despite rounding
        if total > 1.0 + 1e-9 {
            return Err(InputError::InvalidPolicy(format!(
                "formula weights sum to {total}, above 1.0"
            )));
        }
        if self.stay_saturation_days == 0 {
            return Err(InputError::InvalidPolicy(
                "stay_saturation_days must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.high_intent_threshold) {
            return Err(InputError::InvalidPolicy(format!(
                "high_intent_threshold must be within [0, 100], got {}",
                self.high_intent_threshold
            )));
        }
        Ok(())
    }
}

/// Expected marketing lift by targeting percentile.
///
/// Flat at `top_lift` up to the cutoff, then linear down to `baseline_lift`
/// at percentile 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftCurve {
    pub top_cutoff_percentile: u8,
    pub top_lift: f64,
    pub baseline_lift: f64,
}

impl Default for LiftCurve {
    fn default() -> Self {
        Self {
            top_cutoff_percentile: 10,
            top_lift: 10.0,
            baseline_lift: 1.0,
        }
    }
}

impl LiftCurve {
    pub fn validate(&self) -> Result<(), InputError> {
        if !(1..=99).contains(&self.top_cutoff_percentile) {
            return Err(InputError::InvalidPolicy(format!(
                "top_cutoff_percentile must be within [1, 99], got {}",
                self.top_cutoff_percentile
            )));
        }
        if !(self.baseline_lift >= 1.0) {
            return Err(InputError::InvalidPolicy(format!(
                "baseline_lift must be at least 1.0, got {}",
                self.baseline_lift
            )));
        }
        if !(self.top_lift >= self.baseline_lift) {
            return Err(InputError::InvalidPolicy(format!(
                "top_lift {} is below baseline_lift {}",
                self.top_lift, self.baseline_lift
            )));
        }
        Ok(())
    }
}

/// On-disk policy document. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyFile {
    pub scoring: ScoringPolicy,
    pub lift: LiftCurve,
}

impl PolicyFile {
    pub fn validate(&self) -> Result<(), InputError> {
        self.scoring.validate()?;
        self.lift.validate()
    }
}
