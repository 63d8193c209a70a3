use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const MIN_AGE: u8 = 10;
pub const MAX_AGE: u8 = 70;
pub const MIN_STAY_DAYS: u32 = 1;
pub const MIN_PERCENTILE: u8 = 1;
pub const MAX_PERCENTILE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[serde(alias = "여성")]
    Female,
    #[serde(alias = "남성")]
    Male,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Female, Self::Male];

    /// Label shown on the intake form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Female => "여성",
            Self::Male => "남성",
        }
    }

    pub fn from_label(raw: &str) -> Result<Self, InputError> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label() == raw || g.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| InputError::UnknownLabel {
                kind: "gender",
                label: raw.to_string(),
            })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPurpose {
    #[serde(alias = "쇼핑/관광")]
    Shopping,
    #[serde(alias = "의료/시술")]
    Medical,
    #[serde(alias = "비즈니스")]
    Business,
    #[serde(alias = "기타")]
    Other,
}

impl VisitPurpose {
    pub const ALL: [Self; 4] = [Self::Shopping, Self::Medical, Self::Business, Self::Other];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shopping => "쇼핑/관광",
            Self::Medical => "의료/시술",
            Self::Business => "비즈니스",
            Self::Other => "기타",
        }
    }

    pub fn from_label(raw: &str) -> Result<Self, InputError> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label() == raw || p.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| InputError::UnknownLabel {
                kind: "purpose",
                label: raw.to_string(),
            })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shopping => "shopping",
            Self::Medical => "medical",
            Self::Business => "business",
            Self::Other => "other",
        }
    }
}

/// One prospective customer as entered on the intake form.
///
/// Callers must run [`LeadInput::validate`] before scoring; the scorer itself
/// trusts its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInput {
    pub gender: Gender,
    pub age: u8,
    pub purpose: VisitPurpose,
    pub stay_duration_days: u32,
    #[serde(default)]
    pub post_text: String,
}

impl LeadInput {
    pub fn validate(&self) -> Result<(), InputError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(InputError::AgeOutOfRange { age: self.age });
        }
        if self.stay_duration_days < MIN_STAY_DAYS {
            return Err(InputError::StayTooShort {
                days: self.stay_duration_days,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Shopping,
    Leisure,
    Medical,
    Risk,
}

impl Topic {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shopping => "Shopping (T1)",
            Self::Leisure => "Leisure (T2)",
            Self::Medical => "Medical (T3)",
            Self::Risk => "Risk (T4)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicWeights {
    pub shopping: f64,
    pub leisure: f64,
    pub medical: f64,
    pub risk: f64,
}

impl TopicWeights {
    /// Weights in chart order (T1..T4).
    pub const fn entries(&self) -> [(Topic, f64); 4] {
        [
            (Topic::Shopping, self.shopping),
            (Topic::Leisure, self.leisure),
            (Topic::Medical, self.medical),
            (Topic::Risk, self.risk),
        ]
    }

    /// Copy with every weight forced into `[0, 1]`. NaN collapses to zero.
    pub fn clamped(&self) -> Self {
        let c01 = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            shopping: c01(self.shopping),
            leisure: c01(self.leisure),
            medical: c01(self.medical),
            risk: c01(self.risk),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTier {
    HighIntent,
    ModerateIntent,
}

impl IntentTier {
    /// Strictly above the threshold is high intent.
    pub fn from_probability(probability_percent: f64, threshold: f64) -> Self {
        if probability_percent > threshold {
            Self::HighIntent
        } else {
            Self::ModerateIntent
        }
    }

    pub const fn banner(self) -> &'static str {
        match self {
            Self::HighIntent => "High Intent: high-value target lead",
            Self::ModerateIntent => "Moderate Intent: general interest lead",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub probability_percent: f64,
    pub topic_weights: TopicWeights,
    pub tier: IntentTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetQuery {
    pub target_percentile: u8,
}

impl BudgetQuery {
    pub fn new(target_percentile: u8) -> Result<Self, InputError> {
        let query = Self { target_percentile };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if (MIN_PERCENTILE..=MAX_PERCENTILE).contains(&self.target_percentile) {
            Ok(())
        } else {
            Err(InputError::PercentileOutOfRange {
                percentile: self.target_percentile,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub efficiency_multiplier: f64,
    pub cost_saving_percent: u8,
}
