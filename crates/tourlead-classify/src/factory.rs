use std::sync::Arc;

use crate::config::TopicClassifierConfig;
use crate::error::ClassifierError;
use crate::providers::{CheckedTopicClassifier, KeywordTopicClassifier};
use crate::traits::TopicClassifier;

pub fn build_topic_classifier(
    cfg: TopicClassifierConfig,
) -> Result<Arc<dyn TopicClassifier>, ClassifierError> {
    let lexicon = cfg.load_lexicon()?;
    let inner: Arc<dyn TopicClassifier> = Arc::new(KeywordTopicClassifier::new(lexicon)?);
    Ok(Arc::new(CheckedTopicClassifier::new(inner)))
}
