use std::path::PathBuf;

use tourlead_core::{KeywordLexicon, LexiconPreset};

use crate::error::ClassifierError;
use crate::providers::read_lexicon_file;

#[derive(Debug, Clone)]
pub enum TopicClassifierConfig {
    Keyword(KeywordLexicon),
    Preset(LexiconPreset),
    LexiconFile(PathBuf),
}

impl TopicClassifierConfig {
    /// A lexicon file wins over a preset name; no setting means the bilingual preset.
    pub fn from_settings(preset: Option<LexiconPreset>, file: Option<PathBuf>) -> Self {
        match (file, preset) {
            (Some(path), _) => Self::LexiconFile(path),
            (None, Some(preset)) => Self::Preset(preset),
            (None, None) => Self::Preset(LexiconPreset::default()),
        }
    }

    /// Resolves the lexicon this config selects, reading the file if there is one.
    pub fn load_lexicon(&self) -> Result<KeywordLexicon, ClassifierError> {
        match self {
            Self::Keyword(lexicon) => Ok(lexicon.clone()),
            Self::Preset(preset) => Ok(preset.lexicon()),
            Self::LexiconFile(path) => read_lexicon_file(path),
        }
    }
}

impl Default for TopicClassifierConfig {
    fn default() -> Self {
        Self::Preset(LexiconPreset::default())
    }
}
