use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsroomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
