use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::types::TopicWeights;

const SHOPPING_HIT: f64 = 0.8;
const SHOPPING_MISS: f64 = 0.2;
const RISK_HIT: f64 = 0.7;
const RISK_MISS: f64 = 0.1;
const LEISURE_WEIGHT: f64 = 0.3;
const MEDICAL_WEIGHT: f64 = 0.1;

const KO_SHOPPING: &[&str] = &["면세점", "쇼핑"];
const KO_RISK: &[&str] = &["경찰", "분실"];
const EN_SHOPPING: &[&str] = &["duty-free", "shopping"];
const EN_RISK: &[&str] = &["police", "lost/stolen"];

/// A topic that fires when any keyword occurs in the post.
///
/// Matching is a case-sensitive substring test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub hit: f64,
    pub miss: f64,
}

impl KeywordRule {
    fn from_sets(sets: &[&[&str]], hit: f64, miss: f64) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for set in sets {
            for keyword in set.iter() {
                if !keywords.iter().any(|k| k == keyword) {
                    keywords.push((*keyword).to_string());
                }
            }
        }
        Self {
            keywords,
            hit,
            miss,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn weight(&self, text: &str) -> f64 {
        if self.matches(text) {
            self.hit
        } else {
            self.miss
        }
    }

    fn validate(&self, topic: &str) -> Result<(), InputError> {
        if self.keywords.is_empty() {
            return Err(InputError::InvalidPolicy(format!(
                "{topic} rule has no keywords"
            )));
        }
        if self.keywords.iter().any(|k| k.is_empty()) {
            return Err(InputError::InvalidPolicy(format!(
                "{topic} rule contains an empty keyword"
            )));
        }
        check_unit(&format!("{topic}.hit"), self.hit)?;
        check_unit(&format!("{topic}.miss"), self.miss)
    }
}

/// Keyword stand-in for a topic model over social posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordLexicon {
    pub shopping: KeywordRule,
    pub risk: KeywordRule,
    #[serde(default = "default_leisure")]
    pub leisure: f64,
    #[serde(default = "default_medical")]
    pub medical: f64,
}

const fn default_leisure() -> f64 {
    LEISURE_WEIGHT
}

const fn default_medical() -> f64 {
    MEDICAL_WEIGHT
}

impl KeywordLexicon {
    pub fn korean() -> Self {
        Self::from_sets(&[KO_SHOPPING], &[KO_RISK])
    }

    pub fn english() -> Self {
        Self::from_sets(&[EN_SHOPPING], &[EN_RISK])
    }

    pub fn bilingual() -> Self {
        Self::from_sets(&[KO_SHOPPING, EN_SHOPPING], &[KO_RISK, EN_RISK])
    }

    fn from_sets(shopping: &[&[&str]], risk: &[&[&str]]) -> Self {
        Self {
            shopping: KeywordRule::from_sets(shopping, SHOPPING_HIT, SHOPPING_MISS),
            risk: KeywordRule::from_sets(risk, RISK_HIT, RISK_MISS),
            leisure: LEISURE_WEIGHT,
            medical: MEDICAL_WEIGHT,
        }
    }

    pub fn topic_weights(&self, text: &str) -> TopicWeights {
        TopicWeights {
            shopping: self.shopping.weight(text),
            leisure: self.leisure,
            medical: self.medical,
            risk: self.risk.weight(text),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.shopping.validate("shopping")?;
        self.risk.validate("risk")?;
        check_unit("leisure", self.leisure)?;
        check_unit("medical", self.medical)
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::bilingual()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexiconPreset {
    Korean,
    English,
    #[default]
    Bilingual,
}

impl LexiconPreset {
    pub fn lexicon(self) -> KeywordLexicon {
        match self {
            Self::Korean => KeywordLexicon::korean(),
            Self::English => KeywordLexicon::english(),
            Self::Bilingual => KeywordLexicon::bilingual(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
            Self::Bilingual => "bilingual",
        }
    }
}

impl FromStr for LexiconPreset {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "korean" => Ok(Self::Korean),
            "en" | "english" => Ok(Self::English),
            "bilingual" | "all" => Ok(Self::Bilingual),
            other => Err(InputError::UnknownLabel {
                kind: "lexicon",
                label: other.to_string(),
            }),
        }
    }
}

pub(crate) fn check_unit(name: &str, value: f64) -> Result<(), InputError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidPolicy(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
