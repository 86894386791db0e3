use core::fmt;

use uuid::Uuid;

use crate::quiz::{
    models::{AnswerId, Question, QuizFinishResponse},
    session::{Phase, QuizSession},
};

/// `m:ss`, negative input shows as `0:00`.
pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Share of the quiz reached by the cursor, counting the current question.
pub fn progress_percent(index: usize, len: usize) -> u8 {
    if len == 0 {
        return 0;
    }
    (((index + 1).min(len) * 100) / len) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionMarker {
    Current,
    Answered,
    Unanswered,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone)]
pub struct AttemptView {
    pub quiz_id: Uuid,
    pub phase: Phase,
    pub index: usize,
    pub len: usize,
    pub question: Option<Question>,
    pub selected: Option<AnswerId>,
    pub remaining_secs: i64,
    pub markers: Vec<QuestionMarker>,
    pub answered_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub can_submit: bool,
    pub error: Option<String>,
}

impl AttemptView {
    pub fn from_session(session: &QuizSession) -> Self {
        let navigator = session.navigator();
        let index = navigator.index();
        let selection = session.selection();
        let question = session.current_question().cloned();
        let answered = session.current_answered();
        let interactive = session.phase().is_interactive();

        let markers = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| match (i == index, selection.is_answered(&q.id)) {
                (true, _) => QuestionMarker::Current,
                (false, true) => QuestionMarker::Answered,
                (false, false) => QuestionMarker::Unanswered,
            })
            .collect();

        Self {
            quiz_id: session.quiz_id(),
            phase: session.phase(),
            index,
            len: navigator.len(),
            selected: question.as_ref().and_then(|q| selection.answer_for(&q.id)),
            question,
            remaining_secs: session.remaining_secs(),
            markers,
            answered_count: selection.answered_count(),
            can_previous: interactive && !navigator.is_first(),
            can_next: interactive && !navigator.is_last() && answered,
            can_submit: interactive && navigator.is_last() && answered,
            error: session.last_error().map(str::to_string),
        }
    }

    pub fn clock(&self) -> String {
        format_time(self.remaining_secs)
    }

    pub fn progress(&self) -> u8 {
        progress_percent(self.index, self.len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    Great,
    Good,
    Satisfactory,
    NeedsWork,
}

impl Performance {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Performance::Excellent,
            80..=89 => Performance::Great,
            70..=79 => Performance::Good,
            60..=69 => Performance::Satisfactory,
            _ => Performance::NeedsWork,
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Performance::Excellent => write!(f, "Excellent!"),
            Performance::Great => write!(f, "Great!"),
            Performance::Good => write!(f, "Good!"),
            Performance::Satisfactory => write!(f, "Satisfactory"),
            Performance::NeedsWork => write!(f, "Needs improvement"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

impl ResultSummary {
    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage)
    }
}

impl From<&QuizFinishResponse> for ResultSummary {
    fn from(response: &QuizFinishResponse) -> Self {
        let total = u32::try_from(response.data.len()).unwrap_or(u32::MAX);
        let correct = response.correct_count;
        let percentage = match u64::from(total) {
            0 => 0,
            total => {
                let rounded = (u64::from(correct) * 200 + total) / (total * 2);
                u32::try_from(rounded).unwrap_or(u32::MAX)
            }
        };

        Self {
            total,
            correct,
            incorrect: response.incorrect_count,
            percentage,
        }
    }
}
