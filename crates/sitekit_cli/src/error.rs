use sitekit_build::BuildTreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error(transparent)]
    Build(#[from] BuildTreeError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::LoggingInit(_) => 1,
            Self::Build(e) => u8::try_from(e.exit_code()).unwrap_or(1),
        }
    }
}
