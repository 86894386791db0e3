use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type QuestionId = Uuid;
pub type AnswerId = Uuid;

/// Only question type the attempt flow produces.
pub static MULTIPLE_CHOICE: &str = "multiple_choice";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    Pending,
    Active,
    Completed,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStatus::Pending => write!(f, "pending"),
            QuizStatus::Active => write!(f, "active"),
            QuizStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
    pub group_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    /// Minutes.
    pub duration: Option<i64>,
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    pub question_count: u32,
    pub status: QuizStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    pub fn answer_by_label(&self, label: &str) -> Option<&AnswerOption> {
        self.answers
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label.trim()))
    }
}

/// Body of `GET /quiz/{id}/start`. The backend has answered both with a bare
/// question list and with an object wrapping it.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum StartQuizBody {
    Questions(Vec<Question>),
    Session {
        #[serde(alias = "data")]
        questions: Vec<Question>,
        #[serde(default)]
        duration: Option<i64>,
    },
}

#[derive(Debug, Clone)]
pub struct StartedQuiz {
    pub questions: Vec<Question>,
    pub duration_minutes: Option<i64>,
}

impl From<StartQuizBody> for StartedQuiz {
    fn from(body: StartQuizBody) -> Self {
        match body {
            StartQuizBody::Questions(questions) => Self {
                questions,
                duration_minutes: None,
            },
            StartQuizBody::Session {
                questions,
                duration,
            } => Self {
                questions,
                duration_minutes: duration,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuestion {
    pub question_id: QuestionId,
    pub question_type: String,
    pub answers: Vec<AnswerId>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub quiz_id: Uuid,
    pub questions: Vec<SubmissionQuestion>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub id: AnswerId,
    pub text: String,
    pub is_correct: bool,
    pub question_id: QuestionId,
    pub label: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionResult {
    pub id: QuestionId,
    pub text: String,
    pub result: Option<AnswerResult>,
    pub user_result: bool,
}

/// Graded response of `POST /quiz/finish`. The count field names are the
/// backend's spelling.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizFinishResponse {
    pub data: Vec<QuestionResult>,
    #[serde(rename = "correntCount")]
    pub correct_count: u32,
    #[serde(rename = "inCorrentCount")]
    pub incorrect_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> PagedResponse<T> {
    pub fn has_next(&self) -> bool {
        self.meta.page < self.meta.page_count
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizSummary {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorrectAnswerRef {
    pub id: Uuid,
}

/// One earlier attempt as returned by `GET /quiz/my-quiz-result`. The backend
/// fills these loosely, so everything is optional.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MyQuizResult {
    pub id: Option<Uuid>,
    pub quiz: Option<QuizSummary>,
    pub percentage: Option<f64>,
    pub attempts: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
    #[serde(default, rename = "studentCorrentcts")]
    pub student_corrects: Vec<CorrectAnswerRef>,
}

impl MyQuizResult {
    pub fn correct_count(&self) -> usize {
        self.student_corrects.len()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// What the quiz list hands to the attempt when the student opens a quiz.
/// Held in memory only.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    /// Minutes. Takes precedence over the server supplied duration.
    pub duration: Option<i64>,
    pub quiz: Option<Quiz>,
}

impl NavigationState {
    pub fn new(duration: Option<i64>, quiz: Option<Quiz>) -> Self {
        Self { duration, quiz }
    }
}

/// Passed to the results view after a successful submit.
#[derive(Debug, Clone)]
pub struct ResultsHandoff {
    pub result: QuizFinishResponse,
    pub quiz_id: Uuid,
    pub quiz: Option<Quiz>,
    pub from_quiz: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ResultsHandoff {
    pub fn time_spent(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
