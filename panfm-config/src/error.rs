use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
