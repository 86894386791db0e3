use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use uuid::Uuid;

use lms_quiz::{
    auth::models::{ChangePasswordRequest, LoginRequest, UpdateProfileRequest},
    client::lms_client::LmsClient,
    config::config::CONFIG,
    quiz::{
        attempt::{AttemptEvent, Exit, QuizAttempt},
        error::QuizError,
        models::{NavigationState, SortOrder},
    },
};

use crate::cli::{
    error::CliError,
    input::{Input, parse_input},
    render,
};

pub async fn login(client: &LmsClient, phone: String, password: String) -> Result<(), CliError> {
    let user = client.login(&LoginRequest { phone, password }).await?;
    render::user(&user);
    if let Some(token) = client.auth().token() {
        println!("export LMS_TOKEN={}", token);
    }
    Ok(())
}

pub async fn profile(client: &LmsClient, update: UpdateProfileRequest) -> Result<(), CliError> {
    ensure_logged_in(client)?;
    let user = if update.is_empty() {
        client.get_profile().await?
    } else {
        let user = client.update_profile(&update).await?;
        println!("Profile updated");
        user
    };
    render::user(&user);
    Ok(())
}

pub async fn change_password(
    client: &LmsClient,
    request: ChangePasswordRequest,
) -> Result<(), CliError> {
    ensure_logged_in(client)?;
    if !request.passwords_match() {
        return Err(CliError::PasswordMismatch);
    }
    client.change_password(&request).await?;
    println!("Password changed");
    Ok(())
}

pub async fn quizzes(client: &LmsClient, page: u32, page_size: Option<u32>) -> Result<(), CliError> {
    ensure_logged_in(client)?;
    let page_size = page_size.unwrap_or(CONFIG.pagination.page_size);
    let response = client.get_quizzes(page, page_size).await?;
    render::quizzes(&response);
    Ok(())
}

pub async fn results(
    client: &LmsClient,
    quiz_id: Uuid,
    page: u32,
    page_size: Option<u32>,
    sort: SortOrder,
) -> Result<(), CliError> {
    ensure_logged_in(client)?;
    let page_size = page_size.unwrap_or(CONFIG.pagination.page_size);
    let response = client
        .get_my_quiz_results(quiz_id, page, page_size, sort)
        .await?;
    render::my_results(&response);
    Ok(())
}

pub async fn take(client: LmsClient, quiz_id: Uuid, duration: Option<i64>) -> Result<(), CliError> {
    ensure_logged_in(&client)?;

    // Metadata is only carried through to the results screen.
    let quiz = match client.get_quiz(quiz_id).await {
        Ok(quiz) => Some(quiz),
        Err(e) => {
            warn!("Could not fetch metadata for quiz {}: {}", quiz_id, e);
            None
        }
    };

    let (mut attempt, mut events) = QuizAttempt::new(
        Arc::new(client),
        quiz_id,
        NavigationState::new(duration, quiz),
        CONFIG.quiz.default_duration_minutes,
    );

    match attempt.load().await {
        Ok(()) => {
            render::help();
            render::attempt(&attempt.view()?);
        }
        Err(QuizError::NoQuestions) => {
            render::message(&QuizError::NoQuestions.to_string());
            return leave(attempt.escape());
        }
        Err(e) => render::message(&format!("{} (r to retry, q to go back)", e)),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return leave(attempt.escape());
                };
                let Some(input) = parse_input(&line) else {
                    render::help();
                    continue;
                };

                let outcome = match input {
                    Input::Select(label) => attempt.select_label(&label).map(|_| ()),
                    Input::Next => attempt.next().map(|_| ()),
                    Input::Previous => attempt.previous().map(|_| ()),
                    Input::Jump(n) => attempt.jump_to(n - 1),
                    Input::Submit => match attempt.submit().await {
                        Ok(handoff) => return leave(Exit::Results(handoff)),
                        Err(e) => Err(e),
                    },
                    Input::Retry => attempt.retry_load().await,
                    Input::Quit => return leave(attempt.escape()),
                    Input::Help => {
                        render::help();
                        Ok(())
                    }
                };

                match outcome {
                    Ok(()) => render::attempt(&attempt.view()?),
                    Err(QuizError::NoQuestions) => {
                        render::message(&QuizError::NoQuestions.to_string());
                        return leave(attempt.escape());
                    }
                    Err(e) => render::message(&e.to_string()),
                }
            }
            Some(event) = events.recv() => match event {
                AttemptEvent::Tick(remaining) => render::clock(remaining),
                AttemptEvent::Expired => render::message("Time is up, submitting your answers"),
                AttemptEvent::Finished(handoff) => return leave(Exit::Results(handoff)),
                AttemptEvent::SubmitFailed(message) => render::message(&message),
                _ => {}
            },
        }
    }
}

fn leave(exit: Exit) -> Result<(), CliError> {
    match exit {
        Exit::Results(handoff) => render::results(&handoff),
        Exit::BackToQuizList => println!("Back to quizzes"),
    }
    Ok(())
}

fn ensure_logged_in(client: &LmsClient) -> Result<(), CliError> {
    if !client.auth().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    Ok(())
}
