use uuid::Uuid;

use crate::quiz::{
    models::{MULTIPLE_CHOICE, Question, QuizSubmission, SubmissionQuestion},
    selection::SelectionMap,
};

/// One entry per question in question order. Unanswered questions are sent with
/// an empty answer list rather than left out.
pub fn build_submission(
    quiz_id: Uuid,
    questions: &[Question],
    selection: &SelectionMap,
) -> QuizSubmission {
    let questions = questions
        .iter()
        .map(|question| SubmissionQuestion {
            question_id: question.id,
            question_type: MULTIPLE_CHOICE.to_string(),
            answers: selection.answer_for(&question.id).into_iter().collect(),
        })
        .collect();

    QuizSubmission { quiz_id, questions }
}
