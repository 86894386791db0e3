#[cfg(test)]
mod tests {
    use std::{sync::Arc, sync::atomic::Ordering, time::Duration};

    use tokio::sync::mpsc::UnboundedReceiver;
    use uuid::Uuid;

    use crate::{
        quiz::{
            attempt::{AttemptEvent, Exit, QuizAttempt},
            error::QuizError,
            models::{NavigationState, ResultsHandoff},
            session::{Phase, SubmitTrigger},
        },
        tests::{FakeBackend, questions, setup_logging},
    };

    fn attempt_for(
        backend: &Arc<FakeBackend>,
        nav_minutes: Option<i64>,
    ) -> (QuizAttempt, UnboundedReceiver<AttemptEvent>) {
        QuizAttempt::new(
            backend.clone(),
            Uuid::new_v4(),
            NavigationState::new(nav_minutes, None),
            30,
        )
    }

    async fn wait_for_results(events: &mut UnboundedReceiver<AttemptEvent>) -> ResultsHandoff {
        tokio::time::timeout(Duration::from_secs(3600), async {
            while let Some(event) = events.recv().await {
                if let AttemptEvent::Finished(handoff) = event {
                    return handoff;
                }
            }
            panic!("Event channel closed before results arrived");
        })
        .await
        .expect("Timed out waiting for results")
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_submits_partial_answers() {
        setup_logging();
        let backend = Arc::new(FakeBackend::new(questions(3), Some(1)));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();

        attempt.select_label("A").unwrap();
        attempt.next().unwrap();
        attempt.select_label("B").unwrap();
        attempt.next().unwrap();

        let handoff = wait_for_results(&mut events).await;
        assert_eq!(handoff.result.correct_count, 2);
        assert_eq!(attempt.phase().unwrap(), Phase::Done);

        let submissions = backend.submissions();
        assert_eq!(submissions.len(), 1);
        let sent = &submissions[0].questions;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].question_id, backend.questions[0].id);
        assert_eq!(sent[0].answers, vec![backend.questions[0].answers[0].id]);
        assert_eq!(sent[1].question_id, backend.questions[1].id);
        assert_eq!(sent[1].answers, vec![backend.questions[1].answers[1].id]);
        assert_eq!(sent[2].question_id, backend.questions[2].id);
        assert!(sent[2].answers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_once_per_second() {
        let backend = Arc::new(FakeBackend::new(questions(2), Some(1)));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();

        match events.recv().await {
            Some(AttemptEvent::Loaded {
                questions,
                remaining_secs,
            }) => {
                assert_eq!(questions, 2);
                assert_eq!(remaining_secs, 60);
            }
            other => panic!("Expected loaded event, got {:?}", other),
        }

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(attempt.view().unwrap().remaining_secs, 50);

        let mut ticks = vec![];
        while let Ok(AttemptEvent::Tick(remaining)) = events.try_recv() {
            ticks.push(remaining);
        }
        assert_eq!(ticks, (50..60).rev().collect::<Vec<i64>>());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_submits_immediately() {
        let backend = Arc::new(FakeBackend::new(questions(2), Some(10)));
        let (mut attempt, mut events) = attempt_for(&backend, Some(0));
        attempt.load().await.unwrap();

        let handoff = wait_for_results(&mut events).await;
        assert_eq!(handoff.result.data.len(), 2);
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_fires_once() {
        let backend = Arc::new(FakeBackend::new(questions(1), Some(1)).failing_finish(1));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();

        tokio::time::sleep(Duration::from_secs(600)).await;

        let mut expired = 0;
        let mut failures = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                AttemptEvent::Expired => expired += 1,
                AttemptEvent::SubmitFailed(_) => failures += 1,
                _ => {}
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(failures, 1);
        assert_eq!(backend.submissions().len(), 1);
        assert_eq!(attempt.phase().unwrap(), Phase::SubmitFailed);
        assert_eq!(attempt.view().unwrap().remaining_secs, 0);

        // Time ran out, but a manual retry from the last question still works.
        attempt.select_label("C").unwrap();
        let handoff = attempt.submit().await.unwrap();
        assert_eq!(handoff.result.correct_count, 1);
        assert_eq!(backend.submissions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submits_dispatch_once() {
        let backend = Arc::new(
            FakeBackend::new(questions(1), Some(5)).slow_finish(Duration::from_secs(2)),
        );
        let (mut attempt, _events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();
        attempt.select_label("A").unwrap();

        let (first, second) = futures::future::join(attempt.submit(), attempt.submit()).await;
        let outcomes = [first.is_ok(), second.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        let rejected = if first.is_ok() { second } else { first };
        assert_eq!(rejected.unwrap_err(), QuizError::AlreadySubmitting);
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_during_manual_submit_is_absorbed() {
        let backend = Arc::new(
            FakeBackend::new(questions(1), Some(1)).slow_finish(Duration::from_secs(120)),
        );
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();
        attempt.select_label("D").unwrap();

        attempt.submit().await.unwrap();
        assert_eq!(backend.submissions().len(), 1);

        let mut submitting = vec![];
        while let Ok(event) = events.try_recv() {
            if let AttemptEvent::Submitting(trigger) = event {
                submitting.push(trigger);
            }
        }
        assert_eq!(submitting, vec![SubmitTrigger::Confirm]);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_failure_keeps_answers() {
        let backend = Arc::new(FakeBackend::new(questions(3), Some(10)).failing_finish(1));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();

        attempt.select_label("A").unwrap();
        attempt.jump_to(2).unwrap();
        attempt.select_label("B").unwrap();

        let err = attempt.submit().await.unwrap_err();
        assert_eq!(err, QuizError::Submit("Quiz service unavailable".into()));

        let view = attempt.view().unwrap();
        assert_eq!(view.phase, Phase::SubmitFailed);
        assert_eq!(view.error.as_deref(), Some("Quiz service unavailable"));
        assert_eq!(view.index, 2);
        assert_eq!(view.answered_count, 2);
        assert!(view.can_submit);

        attempt.submit().await.unwrap();
        let handoff = wait_for_results(&mut events).await;
        assert_eq!(handoff.result.correct_count, 2);
        assert_eq!(backend.submissions().len(), 2);
        assert_eq!(backend.submissions()[0], backend.submissions()[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn load_failure_then_retry() {
        let backend = Arc::new(FakeBackend::new(questions(2), None).failing_start(1));
        let (mut attempt, _events) = attempt_for(&backend, None);

        let err = attempt.load().await.unwrap_err();
        assert_eq!(err, QuizError::Load("Quiz service unavailable".into()));
        assert_eq!(attempt.phase().unwrap(), Phase::LoadFailed);
        assert!(attempt.select_label("A").is_err());

        attempt.retry_load().await.unwrap();
        assert_eq!(backend.start_calls.load(Ordering::SeqCst), 2);
        let view = attempt.view().unwrap();
        assert_eq!(view.phase, Phase::Active);
        assert_eq!(view.remaining_secs, 30 * 60);
        assert_eq!(view.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_quiz_only_escapes() {
        let backend = Arc::new(FakeBackend::new(vec![], Some(10)));
        let (mut attempt, _events) = attempt_for(&backend, None);

        assert_eq!(attempt.load().await.unwrap_err(), QuizError::NoQuestions);
        assert_eq!(attempt.phase().unwrap(), Phase::Unavailable);
        assert!(attempt.retry_load().await.is_err());
        assert!(matches!(attempt.escape(), Exit::BackToQuizList));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_stops_the_clock() {
        let backend = Arc::new(FakeBackend::new(questions(2), Some(1)));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        attempt.close();
        while events.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(events.try_recv().is_err());
        assert!(backend.submissions().is_empty());
        assert_eq!(attempt.phase().unwrap(), Phase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_attempt_cancels_the_timer() {
        let backend = Arc::new(FakeBackend::new(questions(1), Some(1)));
        let (mut attempt, mut events) = attempt_for(&backend, None);
        attempt.load().await.unwrap();
        drop(attempt);

        let closed = tokio::time::timeout(Duration::from_secs(600), async {
            while events.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
        assert!(backend.submissions().is_empty());
    }
}
