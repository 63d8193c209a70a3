use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tourlead_classify::TopicClassifierConfig;
use tourlead_core::{InputError, LexiconPreset, PolicyFile};

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8797";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOURLEADD_TRANSPORT must be stdio or http, got {0}")]
    Transport(String),

    #[error("TOURLEAD_LEXICON: {0}")]
    Lexicon(InputError),

    #[error("failed to read policy file {path}: {source}")]
    PolicyRead {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse policy file {path}: {source}")]
    PolicyParse {
        path: String,
        source: serde_json::Error,
    },

    #[error("policy file {path}: {source}")]
    PolicyInvalid { path: String, source: InputError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::Transport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub transport: Transport,
    pub http_addr: Option<String>,
    pub classifier: TopicClassifierConfig,
    pub policy: PolicyFile,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let transport = env_opt("TOURLEADD_TRANSPORT")
            .map(|v| v.parse::<Transport>())
            .transpose()?
            .unwrap_or_default();
        let preset = env_opt("TOURLEAD_LEXICON")
            .map(|v| v.parse::<LexiconPreset>())
            .transpose()
            .map_err(ConfigError::Lexicon)?;
        let lexicon_file = env_opt("TOURLEAD_LEXICON_FILE").map(PathBuf::from);
        let policy = match env_opt("TOURLEAD_POLICY_FILE") {
            Some(path) => load_policy(Path::new(&path))?,
            None => PolicyFile::default(),
        };

        Ok(Self {
            transport,
            http_addr: env_opt("TOURLEAD_HTTP_ADDR"),
            classifier: TopicClassifierConfig::from_settings(preset, lexicon_file),
            policy,
        })
    }

    pub fn http_addr(&self) -> &str {
        self.http_addr.as_deref().unwrap_or(DEFAULT_HTTP_ADDR)
    }
}

pub fn load_policy(path: &Path) -> Result<PolicyFile, ConfigError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
        path: display.clone(),
        source,
    })?;
    let policy: PolicyFile =
        serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyParse {
            path: display.clone(),
            source,
        })?;
    policy
        .validate()
        .map_err(|source| ConfigError::PolicyInvalid {
            path: display,
            source,
        })?;
    Ok(policy)
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
