use chrono::Duration;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, level_filters::LevelFilter, warn};
use tracing_subscriber::FmtSubscriber;

use lms_quiz::{
    auth::{
        models::{ChangePasswordRequest, UpdateProfileRequest},
        session::AuthSession,
    },
    client::lms_client::LmsClient,
    config::config::CONFIG,
};

use crate::cli::{
    args::{Args, Command},
    commands,
    error::CliError,
};

mod cli;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let level = CONFIG
        .log
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    if let Err(e) = run(args).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let auth = match args.token.or_else(|| CONFIG.auth.token.clone()) {
        Some(token) => AuthSession::with_token(token),
        None => AuthSession::new(),
    };

    if auth.is_authenticated()
        && auth.is_expiring(Duration::seconds(CONFIG.auth.token_expiry_buffer_secs))
    {
        warn!("Token is expired or about to expire, consider logging in again");
    }

    let base_url = args.base_url.unwrap_or_else(|| CONFIG.api.base_url.clone());
    let client = LmsClient::new(base_url, CONFIG.api.timeout(), auth)?;

    match args.command {
        Command::Login { phone, password } => commands::login(&client, phone, password).await,
        Command::Profile {
            first_name,
            last_name,
        } => {
            let update = UpdateProfileRequest {
                first_name,
                last_name,
            };
            commands::profile(&client, update).await
        }
        Command::ChangePassword {
            current,
            new,
            confirm,
        } => {
            let request = ChangePasswordRequest {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            commands::change_password(&client, request).await
        }
        Command::Quizzes { page, page_size } => commands::quizzes(&client, page, page_size).await,
        Command::Take { quiz_id, duration } => commands::take(client, quiz_id, duration).await,
        Command::Results {
            quiz_id,
            page,
            page_size,
            sort,
        } => commands::results(&client, quiz_id, page, page_size, sort.into()).await,
    }
}
