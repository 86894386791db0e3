use lms_quiz::{client::error::ApiClientError, quiz::error::QuizError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Api(#[from] ApiClientError),

    #[error("{0}")]
    Quiz(#[from] QuizError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not logged in, pass --token or run login first")]
    NotLoggedIn,

    #[error("New passwords do not match")]
    PasswordMismatch,
}
