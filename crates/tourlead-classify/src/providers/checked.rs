use std::sync::Arc;

use tourlead_core::TopicWeights;

use crate::error::ClassifierError;
use crate::traits::TopicClassifier;

/// Guards the scorer against out-of-range classifier output.
///
/// Non-finite weights are rejected; finite ones are clamped into `[0, 1]`.
#[derive(Clone)]
pub struct CheckedTopicClassifier {
    inner: Arc<dyn TopicClassifier>,
}

impl CheckedTopicClassifier {
    pub fn new(inner: Arc<dyn TopicClassifier>) -> Self {
        Self { inner }
    }
}

impl TopicClassifier for CheckedTopicClassifier {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn classify(&self, text: &str) -> Result<TopicWeights, ClassifierError> {
        let raw = self.inner.classify(text)?;
        if let Some((topic, w)) = raw.entries().into_iter().find(|(_, w)| !w.is_finite()) {
            return Err(ClassifierError::InvalidResponse(format!(
                "{} weight for {} is {w}",
                self.inner.name(),
                topic.label()
            )));
        }
        let clamped = raw.clamped();
        if clamped != raw {
            tracing::debug!(provider = self.inner.name(), "clamped topic weights");
        }
        Ok(clamped)
    }
}
