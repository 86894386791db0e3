mod quiz_attempt;

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

use crate::{
    client::error::ApiClientError,
    quiz::{
        backend::QuizBackend,
        models::{
            AnswerOption, AnswerResult, Question, QuestionResult, QuizFinishResponse,
            QuizSubmission, StartedQuiz,
        },
    },
};

pub fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn question(text: &str) -> Question {
    Question {
        id: Uuid::new_v4(),
        text: text.into(),
        answers: ["A", "B", "C", "D"]
            .iter()
            .map(|label| AnswerOption {
                id: Uuid::new_v4(),
                label: label.to_string(),
                text: format!("option {}", label),
            })
            .collect(),
    }
}

pub fn questions(n: usize) -> Vec<Question> {
    (0..n).map(|i| question(&format!("Question {}", i + 1))).collect()
}

/// Grades every submitted answer as correct. Mirrors the shape the backend
/// sends back.
pub fn grade(submission: &QuizSubmission) -> QuizFinishResponse {
    let data: Vec<QuestionResult> = submission
        .questions
        .iter()
        .map(|q| QuestionResult {
            id: q.question_id,
            text: "graded".into(),
            result: q.answers.first().map(|answer_id| AnswerResult {
                id: *answer_id,
                text: "option".into(),
                is_correct: true,
                question_id: q.question_id,
                label: "A".into(),
                created_at: None,
                updated_at: None,
            }),
            user_result: !q.answers.is_empty(),
        })
        .collect();

    let correct = data.iter().filter(|q| q.user_result).count() as u32;
    QuizFinishResponse {
        correct_count: correct,
        incorrect_count: data.len() as u32 - correct,
        data,
    }
}

fn server_error() -> ApiClientError {
    ApiClientError::ApiError(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"Quiz service unavailable"}"#.into(),
    )
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// In-memory backend with scripted failures and an optional delay on finish.
pub struct FakeBackend {
    pub questions: Vec<Question>,
    pub duration: Option<i64>,
    pub start_failures: AtomicUsize,
    pub finish_failures: AtomicUsize,
    pub finish_delay: Option<Duration>,
    pub start_calls: AtomicUsize,
    pub submissions: Mutex<Vec<QuizSubmission>>,
}

impl FakeBackend {
    pub fn new(questions: Vec<Question>, duration: Option<i64>) -> Self {
        Self {
            questions,
            duration,
            start_failures: AtomicUsize::new(0),
            finish_failures: AtomicUsize::new(0),
            finish_delay: None,
            start_calls: AtomicUsize::new(0),
            submissions: Mutex::new(vec![]),
        }
    }

    pub fn failing_start(mut self, times: usize) -> Self {
        self.start_failures = AtomicUsize::new(times);
        self
    }

    pub fn failing_finish(mut self, times: usize) -> Self {
        self.finish_failures = AtomicUsize::new(times);
        self
    }

    pub fn slow_finish(mut self, delay: Duration) -> Self {
        self.finish_delay = Some(delay);
        self
    }

    pub fn submissions(&self) -> Vec<QuizSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn start_quiz(&self, _quiz_id: Uuid) -> Result<StartedQuiz, ApiClientError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.start_failures) {
            return Err(server_error());
        }

        Ok(StartedQuiz {
            questions: self.questions.clone(),
            duration_minutes: self.duration,
        })
    }

    async fn finish_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<QuizFinishResponse, ApiClientError> {
        if let Some(delay) = self.finish_delay {
            tokio::time::sleep(delay).await;
        }

        self.submissions.lock().unwrap().push(submission.clone());
        if take_failure(&self.finish_failures) {
            return Err(server_error());
        }
        Ok(grade(submission))
    }
}
