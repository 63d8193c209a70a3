use crate::lexicon::KeywordLexicon;
use crate::policy::ScoringPolicy;
use crate::types::{IntentTier, LeadInput, ScoreResult, TopicWeights};

/// Subscription-probability scorer.
///
/// Inputs are trusted; run [`LeadInput::validate`] first.
#[derive(Debug, Clone, Default)]
pub struct LeadScorer {
    policy: ScoringPolicy,
    lexicon: KeywordLexicon,
}

impl LeadScorer {
    pub fn new(policy: ScoringPolicy, lexicon: KeywordLexicon) -> Self {
        Self { policy, lexicon }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn lexicon(&self) -> &KeywordLexicon {
        &self.lexicon
    }

    pub fn score(&self, input: &LeadInput) -> ScoreResult {
        let topics = self.lexicon.topic_weights(&input.post_text);
        self.score_with_topics(input, topics)
    }

    /// Applies the probability formula to externally classified topics.
    pub fn score_with_topics(&self, input: &LeadInput, topics: TopicWeights) -> ScoreResult {
        let p = &self.policy;
        let probability = (topics.shopping * p.shopping_weight
            + topics.risk * p.risk_weight
            + self.stay_fraction(input.stay_duration_days) * p.stay_weight)
            * 100.0;

        ScoreResult {
            probability_percent: probability,
            topic_weights: topics,
            tier: IntentTier::from_probability(probability, p.high_intent_threshold),
        }
    }

    /// Stay length as a fraction of the saturation window, capped at 1.
    fn stay_fraction(&self, days: u32) -> f64 {
        let cap = self.policy.stay_saturation_days.max(1);
        f64::from(days.min(cap)) / f64::from(cap)
    }
}

/// Scores with the default policy and bilingual lexicon.
pub fn score(input: &LeadInput) -> ScoreResult {
    LeadScorer::default().score(input)
}
