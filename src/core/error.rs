use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    InvalidArgument(String),
    InvalidConfig(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::InvalidArgument(msg) => write!(f, "Invalid Argument: {}", msg),
            StatsError::InvalidConfig(msg) => write!(f, "Invalid Config: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

impl StatsError {
    pub fn invalid_argument(message: impl Into<String>) -> Self { StatsError::InvalidArgument(message.into()) }
    pub fn invalid_config(message: impl Into<String>) -> Self { StatsError::InvalidConfig(message.into()) }
}

pub type StatsResult<T> = Result<T, StatsError>;
