use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("age must be between 10 and 70, got {age}")]
    AgeOutOfRange { age: u8 },

    #[error("stay duration must be at least 1 day, got {days}")]
    StayTooShort { days: u32 },

    #[error("target percentile must be between 1 and 100, got {percentile}")]
    PercentileOutOfRange { percentile: u8 },

    #[error("unknown {kind} label: {label}")]
    UnknownLabel { kind: &'static str, label: String },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}
