use tourlead_core::TopicWeights;

use crate::error::ClassifierError;

/// Maps free text to interest weights over the four marketing topics.
pub trait TopicClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(&self, text: &str) -> Result<TopicWeights, ClassifierError>;
}
