use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    client::error::ApiClientError,
    quiz::models::{QuizFinishResponse, QuizSubmission, StartedQuiz},
};

/// The two endpoints an attempt talks to.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn start_quiz(&self, quiz_id: Uuid) -> Result<StartedQuiz, ApiClientError>;

    async fn finish_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<QuizFinishResponse, ApiClientError>;
}
