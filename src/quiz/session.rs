use core::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::quiz::{
    error::QuizError,
    models::{
        AnswerId, NavigationState, Question, QuestionId, QuizFinishResponse, QuizSubmission,
        ResultsHandoff, StartedQuiz,
    },
    navigator::QuestionNavigator,
    selection::SelectionMap,
    submission::build_submission,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    LoadFailed,
    /// No questions came back. Only way out is the quiz list.
    Unavailable,
    Active,
    Submitting,
    /// Same interactions as `Active`, the selections survive the failure.
    SubmitFailed,
    Done,
    Closed,
}

impl Phase {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Phase::Active | Phase::SubmitFailed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Closed | Phase::Unavailable)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Loading => write!(f, "loading"),
            Phase::LoadFailed => write!(f, "load failed"),
            Phase::Unavailable => write!(f, "unavailable"),
            Phase::Active => write!(f, "active"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::SubmitFailed => write!(f, "submit failed"),
            Phase::Done => write!(f, "done"),
            Phase::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Confirm,
    Timeout,
}

impl fmt::Display for SubmitTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitTrigger::Confirm => write!(f, "confirm"),
            SubmitTrigger::Timeout => write!(f, "timeout"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(i64),
    /// Returned once, on the tick that reaches zero.
    Expired,
    Stopped,
}

/// State of one timed attempt. All mutation happens here, synchronously. The
/// async side only feeds it network results stamped with the generation they
/// were started under.
#[derive(Debug)]
pub struct QuizSession {
    quiz_id: Uuid,
    navigation: NavigationState,
    default_duration_minutes: i64,
    phase: Phase,
    generation: u64,
    load_in_flight: bool,
    questions: Vec<Question>,
    selection: SelectionMap,
    navigator: QuestionNavigator,
    remaining_secs: i64,
    expired: bool,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new(quiz_id: Uuid, navigation: NavigationState, default_duration_minutes: i64) -> Self {
        Self {
            quiz_id,
            navigation,
            default_duration_minutes,
            phase: Phase::Loading,
            generation: 0,
            load_in_flight: false,
            questions: vec![],
            selection: SelectionMap::new(),
            navigator: QuestionNavigator::new(0),
            remaining_secs: 0,
            expired: false,
            last_error: None,
            started_at: None,
        }
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    pub fn navigator(&self) -> &QuestionNavigator {
        &self.navigator
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs.max(0)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.navigator.index())
    }

    pub fn current_answered(&self) -> bool {
        self.current_question()
            .is_some_and(|q| self.selection.is_answered(&q.id))
    }

    /* Loading */

    pub fn begin_load(&mut self) -> Result<u64, QuizError> {
        match self.phase {
            Phase::Loading if !self.load_in_flight => {}
            Phase::LoadFailed => {}
            phase => return Err(QuizError::NotActive(phase)),
        }

        self.phase = Phase::Loading;
        self.load_in_flight = true;
        self.last_error = None;
        Ok(self.generation)
    }

    /// Seeds the clock: navigation duration first, then a positive server
    /// duration, then the configured default. Returns the seeded seconds.
    pub fn apply_loaded(&mut self, generation: u64, started: StartedQuiz) -> Result<i64, QuizError> {
        self.ensure_current(generation)?;
        self.load_in_flight = false;

        if started.questions.is_empty() {
            warn!("Quiz {} returned no questions", self.quiz_id);
            self.phase = Phase::Unavailable;
            return Err(QuizError::NoQuestions);
        }

        let minutes = match (self.navigation.duration, started.duration_minutes) {
            (Some(minutes), _) => minutes,
            (None, Some(minutes)) if minutes > 0 => minutes,
            _ => self.default_duration_minutes,
        };

        self.navigator = QuestionNavigator::new(started.questions.len());
        self.questions = started.questions;
        self.remaining_secs = minutes.saturating_mul(60);
        self.started_at = Some(Utc::now());
        self.phase = Phase::Active;

        info!(
            "Quiz {} loaded with {} questions, {} seconds on the clock",
            self.quiz_id,
            self.questions.len(),
            self.remaining_secs
        );
        Ok(self.remaining_secs)
    }

    pub fn apply_load_failed(&mut self, generation: u64, message: String) -> Result<(), QuizError> {
        self.ensure_current(generation)?;
        self.load_in_flight = false;
        self.phase = Phase::LoadFailed;
        self.last_error = Some(message);
        Ok(())
    }

    /* Answering and navigation */

    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        answer_id: AnswerId,
    ) -> Result<bool, QuizError> {
        self.ensure_interactive()?;
        let changed = self.selection.select(question_id, answer_id);
        if changed {
            debug!("Question {} answered with {}", question_id, answer_id);
        }
        Ok(changed)
    }

    pub fn next(&mut self) -> Result<bool, QuizError> {
        self.ensure_interactive()?;
        let answered = self.current_answered();
        Ok(self.navigator.next(answered))
    }

    pub fn previous(&mut self) -> Result<bool, QuizError> {
        self.ensure_interactive()?;
        Ok(self.navigator.previous())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.ensure_interactive()?;
        self.navigator.jump_to(index)
    }

    /* Clock */

    /// Marks the clock expired if it was seeded at zero or below. True at most once.
    pub fn take_expiry(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.expired || self.remaining_secs > 0 {
            return false;
        }
        self.remaining_secs = 0;
        self.expired = true;
        true
    }

    pub fn tick(&mut self, generation: u64) -> Tick {
        if generation != self.generation || self.expired {
            return Tick::Stopped;
        }
        match self.phase {
            Phase::Active | Phase::Submitting | Phase::SubmitFailed => {}
            _ => return Tick::Stopped,
        }

        self.remaining_secs = (self.remaining_secs - 1).max(0);
        if self.remaining_secs == 0 {
            self.expired = true;
            info!("Time is up for quiz {}", self.quiz_id);
            return Tick::Expired;
        }
        Tick::Running(self.remaining_secs)
    }

    /* Submission */

    /// Moves to `Submitting` and builds the payload. The phase change is the
    /// single guard shared by the confirm and timeout paths.
    pub fn begin_submit(
        &mut self,
        trigger: SubmitTrigger,
    ) -> Result<(u64, QuizSubmission), QuizError> {
        match self.phase {
            Phase::Active | Phase::SubmitFailed => {}
            Phase::Submitting => return Err(QuizError::AlreadySubmitting),
            phase => return Err(QuizError::NotActive(phase)),
        }

        if trigger == SubmitTrigger::Confirm {
            if !self.navigator.is_last() {
                return Err(QuizError::NotLastQuestion);
            }
            if !self.current_answered() {
                return Err(QuizError::NotAnswered);
            }
        }

        self.phase = Phase::Submitting;
        self.last_error = None;
        let submission = build_submission(self.quiz_id, &self.questions, &self.selection);
        Ok((self.generation, submission))
    }

    pub fn apply_submitted(
        &mut self,
        generation: u64,
        result: QuizFinishResponse,
    ) -> Result<ResultsHandoff, QuizError> {
        self.ensure_current(generation)?;
        self.phase = Phase::Done;

        let finished_at = Utc::now();
        Ok(ResultsHandoff {
            result,
            quiz_id: self.quiz_id,
            quiz: self.navigation.quiz.clone(),
            from_quiz: true,
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
        })
    }

    pub fn apply_submit_failed(&mut self, generation: u64, message: String) -> Result<(), QuizError> {
        self.ensure_current(generation)?;
        self.phase = Phase::SubmitFailed;
        self.last_error = Some(message);
        Ok(())
    }

    /// Invalidates everything in flight. Late responses and timer ticks for the
    /// old generation are ignored from here on.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.load_in_flight = false;
        self.phase = Phase::Closed;
    }

    fn ensure_current(&self, generation: u64) -> Result<(), QuizError> {
        if generation != self.generation {
            debug!(
                "Dropping response for generation {} (current {})",
                generation, self.generation
            );
            return Err(QuizError::Stale);
        }
        Ok(())
    }

    fn ensure_interactive(&mut self) -> Result<(), QuizError> {
        if !self.phase.is_interactive() {
            return Err(QuizError::NotActive(self.phase));
        }
        if self.phase == Phase::SubmitFailed {
            self.phase = Phase::Active;
        }
        Ok(())
    }
}
