use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::quiz::{
    backend::QuizBackend,
    error::QuizError,
    models::{AnswerId, NavigationState, QuestionId, ResultsHandoff},
    session::{Phase, QuizSession, SubmitTrigger},
    timer::CountdownTimer,
    view::AttemptView,
};

static LOAD_FAILED: &str = "Failed to start quiz. Please try again.";
static SUBMIT_FAILED: &str = "Failed to submit quiz. Please try again.";

#[derive(Debug, Clone)]
pub enum AttemptEvent {
    Loaded { questions: usize, remaining_secs: i64 },
    LoadFailed(String),
    Unavailable,
    Tick(i64),
    Expired,
    Submitting(SubmitTrigger),
    Finished(ResultsHandoff),
    SubmitFailed(String),
}

/// Where the front-end goes when the attempt is over.
#[derive(Debug, Clone)]
pub enum Exit {
    BackToQuizList,
    Results(ResultsHandoff),
}

/// Shared by the attempt and its timer task. Builds and sends the submission
/// and applies the outcome to the session.
#[derive(Clone)]
pub struct Dispatcher {
    session: Arc<Mutex<QuizSession>>,
    backend: Arc<dyn QuizBackend>,
    events: UnboundedSender<AttemptEvent>,
}

impl Dispatcher {
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut QuizSession) -> R,
    ) -> Result<R, QuizError> {
        let mut lock = self.session.lock().map_err(|_| QuizError::Lock)?;
        Ok(f(&mut *lock))
    }

    pub fn emit(&self, event: AttemptEvent) {
        // A dropped receiver only means nobody is rendering any more.
        let _ = self.events.send(event);
    }

    pub async fn dispatch(&self, trigger: SubmitTrigger) -> Result<ResultsHandoff, QuizError> {
        let (generation, submission) = self.with_session(|s| s.begin_submit(trigger))??;
        info!(
            "Submitting quiz {} on {} with {} questions",
            submission.quiz_id,
            trigger,
            submission.questions.len()
        );
        self.emit(AttemptEvent::Submitting(trigger));

        match self.backend.finish_quiz(&submission).await {
            Ok(result) => {
                let handoff = self.with_session(|s| s.apply_submitted(generation, result))??;
                info!(
                    "Quiz {} graded: {} correct, {} incorrect",
                    handoff.quiz_id, handoff.result.correct_count, handoff.result.incorrect_count
                );
                self.emit(AttemptEvent::Finished(handoff.clone()));
                Ok(handoff)
            }
            Err(e) => {
                error!(
                    "Failed to submit quiz {} (status {:?}): {}",
                    submission.quiz_id,
                    e.status(),
                    e
                );
                let message = e.user_message(SUBMIT_FAILED);
                self.with_session(|s| s.apply_submit_failed(generation, message.clone()))??;
                self.emit(AttemptEvent::SubmitFailed(message.clone()));
                Err(QuizError::Submit(message))
            }
        }
    }
}

/// One student's timed attempt at a quiz. Owns the countdown task, which is
/// cancelled when the attempt is closed or dropped.
pub struct QuizAttempt {
    dispatcher: Dispatcher,
    timer: Option<CountdownTimer>,
}

impl QuizAttempt {
    pub fn new(
        backend: Arc<dyn QuizBackend>,
        quiz_id: Uuid,
        navigation: NavigationState,
        default_duration_minutes: i64,
    ) -> (Self, UnboundedReceiver<AttemptEvent>) {
        let (events, receiver) = unbounded_channel();
        let session = QuizSession::new(quiz_id, navigation, default_duration_minutes);

        let attempt = Self {
            dispatcher: Dispatcher {
                session: Arc::new(Mutex::new(session)),
                backend,
                events,
            },
            timer: None,
        };

        (attempt, receiver)
    }

    /// Fetches the questions and starts the clock. Call again after a failure
    /// to retry the same request.
    pub async fn load(&mut self) -> Result<(), QuizError> {
        let (generation, quiz_id) = self
            .dispatcher
            .with_session(|s| s.begin_load().map(|g| (g, s.quiz_id())))??;
        info!("Starting quiz {}", quiz_id);

        let started = match self.dispatcher.backend.start_quiz(quiz_id).await {
            Ok(started) => started,
            Err(e) => {
                error!("Failed to start quiz {} (status {:?}): {}", quiz_id, e.status(), e);
                let message = e.user_message(LOAD_FAILED);
                self.dispatcher
                    .with_session(|s| s.apply_load_failed(generation, message.clone()))??;
                self.dispatcher.emit(AttemptEvent::LoadFailed(message.clone()));
                return Err(QuizError::Load(message));
            }
        };

        let questions = started.questions.len();
        match self
            .dispatcher
            .with_session(|s| s.apply_loaded(generation, started))?
        {
            Ok(remaining_secs) => {
                self.dispatcher.emit(AttemptEvent::Loaded {
                    questions,
                    remaining_secs,
                });
                self.timer = Some(CountdownTimer::start(self.dispatcher.clone(), generation));
                Ok(())
            }
            Err(QuizError::NoQuestions) => {
                self.dispatcher.emit(AttemptEvent::Unavailable);
                Err(QuizError::NoQuestions)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn retry_load(&mut self) -> Result<(), QuizError> {
        self.load().await
    }

    pub fn select_answer(
        &self,
        question_id: QuestionId,
        answer_id: AnswerId,
    ) -> Result<bool, QuizError> {
        self.dispatcher
            .with_session(|s| s.select_answer(question_id, answer_id))?
    }

    /// Selects an option of the current question by its label, e.g. `"B"`.
    pub fn select_label(&self, label: &str) -> Result<bool, QuizError> {
        self.dispatcher.with_session(|s| {
            let picked = s
                .current_question()
                .and_then(|q| q.answer_by_label(label).map(|a| (q.id, a.id)));
            match picked {
                Some((question_id, answer_id)) => s.select_answer(question_id, answer_id),
                None => Err(QuizError::UnknownAnswer(label.to_string())),
            }
        })?
    }

    pub fn next(&self) -> Result<bool, QuizError> {
        self.dispatcher.with_session(|s| s.next())?
    }

    pub fn previous(&self) -> Result<bool, QuizError> {
        self.dispatcher.with_session(|s| s.previous())?
    }

    pub fn jump_to(&self, index: usize) -> Result<(), QuizError> {
        self.dispatcher.with_session(|s| s.jump_to(index))?
    }

    /// Manual submit from the last question.
    pub async fn submit(&self) -> Result<ResultsHandoff, QuizError> {
        self.dispatcher.dispatch(SubmitTrigger::Confirm).await
    }

    pub fn phase(&self) -> Result<Phase, QuizError> {
        self.dispatcher.with_session(|s| s.phase())
    }

    pub fn view(&self) -> Result<AttemptView, QuizError> {
        self.dispatcher.with_session(|s| AttemptView::from_session(s))
    }

    /// Leaves the attempt for the quiz list. Anything still in flight is dropped.
    pub fn escape(mut self) -> Exit {
        self.close();
        Exit::BackToQuizList
    }

    pub fn close(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        match self.dispatcher.with_session(|s| s.teardown()) {
            Ok(()) => info!("Quiz attempt closed"),
            Err(e) => warn!("Failed to tear down quiz session: {}", e),
        }
    }
}

impl Drop for QuizAttempt {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        let _ = self.dispatcher.with_session(|s| {
            if !s.phase().is_terminal() {
                s.teardown();
            }
        });
    }
}
