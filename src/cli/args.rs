use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use lms_quiz::quiz::models::SortOrder;

#[derive(Debug, Parser)]
#[command(name = "lms-quiz", version, about = "Take LMS quizzes from the terminal")]
pub struct Args {
    /// Bearer token from a previous login
    #[arg(long, env = "LMS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Overrides api.base_url
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the token to reuse with --token
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long, env = "LMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the logged in user, or update the name when given
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Change the password of the logged in user
    ChangePassword {
        #[arg(long, env = "LMS_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "LMS_NEW_PASSWORD", hide_env_values = true)]
        new: String,
        /// Repeat of --new
        #[arg(long)]
        confirm: String,
    },
    /// List quizzes
    Quizzes {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Take a timed quiz
    Take {
        quiz_id: Uuid,
        /// Minutes, overrides the duration sent by the server
        #[arg(long)]
        duration: Option<i64>,
    },
    /// Show earlier results for a quiz
    Results {
        quiz_id: Uuid,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, value_enum, default_value_t = Sort::Asc)]
        sort: Sort,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Sort {
    Asc,
    Desc,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => SortOrder::Asc,
            Sort::Desc => SortOrder::Desc,
        }
    }
}
