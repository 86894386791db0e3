use lms_quiz::{
    auth::models::User,
    quiz::{
        models::{MyQuizResult, PagedResponse, Quiz, ResultsHandoff},
        view::{AttemptView, QuestionMarker, ResultSummary, format_time},
    },
};

pub fn help() {
    println!("Commands: a <label> select | n next | p previous | j <n> jump | s submit | r retry | q quit");
    println!("A single letter selects that answer, except n p s r q h which are commands");
}

pub fn attempt(view: &AttemptView) {
    let Some(question) = &view.question else {
        return;
    };

    println!();
    println!(
        "Question {} of {}  [{}%]  {}",
        view.index + 1,
        view.len,
        view.progress(),
        view.clock()
    );
    println!("{}", question.text);
    for answer in &question.answers {
        let mark = if view.selected == Some(answer.id) { "x" } else { " " };
        println!("  ({}) {}. {}", mark, answer.label, answer.text);
    }

    let grid: Vec<String> = view
        .markers
        .iter()
        .enumerate()
        .map(|(i, marker)| match marker {
            QuestionMarker::Current => format!("[{}*]", i + 1),
            QuestionMarker::Answered => format!("[{}+]", i + 1),
            QuestionMarker::Unanswered => format!("[{} ]", i + 1),
        })
        .collect();
    println!("{}", grid.join(" "));

    if let Some(error) = &view.error {
        println!("! {}", error);
    }

    let mut hints = vec![];
    if view.can_previous {
        hints.push("p previous");
    }
    if view.can_next {
        hints.push("n next");
    }
    if view.can_submit {
        hints.push("s submit");
    }
    if !hints.is_empty() {
        println!("{}", hints.join(" | "));
    }
}

pub fn clock(remaining_secs: i64) {
    if remaining_secs % 60 == 0 || remaining_secs <= 10 {
        println!("Time left: {}", format_time(remaining_secs));
    }
}

pub fn message(text: &str) {
    println!("! {}", text);
}

pub fn results(handoff: &ResultsHandoff) {
    let summary = ResultSummary::from(&handoff.result);
    let title = handoff
        .quiz
        .as_ref()
        .map(|q| q.title.as_str())
        .unwrap_or("Quiz");

    println!();
    println!("{} finished in {}", title, format_time(handoff.time_spent().num_seconds()));
    println!(
        "Score: {}% ({})  correct {}/{}  incorrect {}/{}",
        summary.percentage,
        summary.performance(),
        summary.correct,
        summary.total,
        summary.incorrect,
        summary.total
    );

    for (i, question) in handoff.result.data.iter().enumerate() {
        let mark = if question.user_result { "+" } else { "-" };
        println!("{:>3}. [{}] {}", i + 1, mark, question.text);
        if let Some(answer) = &question.result {
            println!("       correct: {}. {}", answer.label, answer.text);
        }
    }
}

pub fn quizzes(page: &PagedResponse<Quiz>) {
    for quiz in &page.data {
        let duration = quiz
            .duration
            .map(|d| format!("{} min", d))
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  {:<32} {:<10} {:>8} {:>4} questions",
            quiz.id,
            quiz.title,
            quiz.status.to_string(),
            duration,
            quiz.question_count
        );
    }
    println!(
        "Page {} of {} ({} quizzes)",
        page.meta.page, page.meta.page_count, page.meta.total
    );
    if page.has_next() {
        println!("More with --page {}", page.meta.page + 1);
    }
}

pub fn my_results(page: &PagedResponse<MyQuizResult>) {
    if page.data.is_empty() {
        println!("No results yet");
        return;
    }

    for result in &page.data {
        let title = result
            .quiz
            .as_ref()
            .and_then(|q| q.title.as_deref())
            .unwrap_or("Unknown quiz");
        let percentage = result
            .percentage
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| "-".into());
        let date = result
            .created_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  {:<32} {:>5}  {}/{} correct",
            date,
            title,
            percentage,
            result.correct_count(),
            result.questions.len()
        );
    }
}

pub fn user(user: &User) {
    println!("{} ({}) {}", user.display_name(), user.role, user.phone);
}
