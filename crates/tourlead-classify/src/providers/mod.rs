pub mod checked;
pub mod keyword;

pub use checked::CheckedTopicClassifier;
pub use keyword::{read_lexicon_file, KeywordTopicClassifier};
