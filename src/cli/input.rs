/// One line typed during an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Select(String),
    Next,
    Previous,
    /// 1-based, as shown in the question grid.
    Jump(usize),
    Submit,
    Retry,
    Quit,
    Help,
}

pub fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_ascii_lowercase();
    let argument = parts.next();

    match (command.as_str(), argument) {
        ("a", Some(label)) => Some(Input::Select(label.to_string())),
        ("n", None) => Some(Input::Next),
        ("p", None) => Some(Input::Previous),
        ("j", Some(n)) => n.parse::<usize>().ok().filter(|n| *n > 0).map(Input::Jump),
        ("s", None) => Some(Input::Submit),
        ("r", None) => Some(Input::Retry),
        ("q", None) => Some(Input::Quit),
        ("h" | "?", None) => Some(Input::Help),
        // A bare label selects an answer unless it is one of the commands above
        (label, None) if label.len() == 1 && label.chars().all(|c| c.is_ascii_alphabetic()) => {
            Some(Input::Select(label.to_uppercase()))
        }
        _ => None,
    }
}
