use crate::quiz::session::Phase;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Failed to start quiz: {0}")]
    Load(String),

    #[error("Failed to submit quiz: {0}")]
    Submit(String),

    #[error("The quiz you're looking for doesn't exist or has expired")]
    NoQuestions,

    #[error("Action not allowed while the attempt is {0}")]
    NotActive(Phase),

    #[error("The current question has not been answered")]
    NotAnswered,

    #[error("No answer labelled {0} on the current question")]
    UnknownAnswer(String),

    #[error("Submit is only available on the last question")]
    NotLastQuestion,

    #[error("Question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Quiz is already being submitted")]
    AlreadySubmitting,

    #[error("Response belongs to a session that is no longer current")]
    Stale,

    #[error("Quiz session lock was poisoned")]
    Lock,
}
