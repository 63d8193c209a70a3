use std::fs;
use std::path::Path;

use tourlead_core::{KeywordLexicon, TopicWeights};

use crate::error::ClassifierError;
use crate::traits::TopicClassifier;

#[derive(Debug, Clone)]
pub struct KeywordTopicClassifier {
    lexicon: KeywordLexicon,
}

impl KeywordTopicClassifier {
    pub fn new(lexicon: KeywordLexicon) -> Result<Self, ClassifierError> {
        lexicon.validate()?;
        Ok(Self { lexicon })
    }
}

/// Reads a JSON-encoded [`KeywordLexicon`]. Validation happens when it is
/// handed to [`KeywordTopicClassifier::new`].
pub fn read_lexicon_file(path: impl AsRef<Path>) -> Result<KeywordLexicon, ClassifierError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let lexicon: KeywordLexicon = serde_json::from_str(&raw)?;
    tracing::debug!(
        path = %path.display(),
        shopping = lexicon.shopping.keywords.len(),
        risk = lexicon.risk.keywords.len(),
        "loaded keyword lexicon"
    );
    Ok(lexicon)
}

impl TopicClassifier for KeywordTopicClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn classify(&self, text: &str) -> Result<TopicWeights, ClassifierError> {
        Ok(self.lexicon.topic_weights(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_with_lexicon() {
        let classifier =
            KeywordTopicClassifier::new(KeywordLexicon::english()).expect("valid lexicon");
        let weights = classifier.classify("duty-free haul").expect("classify");
        assert_eq!(weights.shopping, 0.8);
        assert_eq!(weights.risk, 0.1);
    }

    #[test]
    fn rejects_invalid_lexicon() {
        let mut lexicon = KeywordLexicon::korean();
        lexicon.shopping.hit = 1.5;
        assert!(matches!(
            KeywordTopicClassifier::new(lexicon),
            Err(ClassifierError::Lexicon(_))
        ));
    }
}
