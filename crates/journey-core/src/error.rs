use thiserror::Error;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("not initialized: run 'journey init'")]
    NotInitialized,

    #[error("invalid day {0}: days run from 1 to 7")]
    InvalidDay(u8),

    #[error("record '{key}' holds day {found}")]
    DayMismatch { key: String, found: u8 },

    #[error("day {0} is locked: complete the previous day first")]
    DayLocked(u8),

    #[error("day {0} is already completed")]
    DayCompleted(u8),

    #[error("day {day} has no checklist item {index}")]
    InvalidChecklistIndex { day: u8, index: usize },

    #[error("{0}")]
    Validation(String),

    #[error("notification permission not granted: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    MissingPriorState(String),

    #[error("'{kind}' does not belong to day {day}")]
    CollaboratorMismatch { day: u8, kind: String },

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("invalid store key '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidKey(String),

    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("invalid frequency '{0}': expected daily, every-other-day or weekly")]
    InvalidFrequency(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JourneyError>;
