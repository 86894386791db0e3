use std::collections::HashMap;

use crate::quiz::models::{AnswerId, QuestionId};

/// Single choice per question. Entries are added or overwritten, never removed.
#[derive(Debug, Clone, Default)]
pub struct SelectionMap {
    selected: HashMap<QuestionId, AnswerId>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `answer_id` was already the selection, which leaves the
    /// map untouched. Selecting the same answer again never clears it.
    pub fn select(&mut self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        match self.selected.insert(question_id, answer_id) {
            Some(previous) => previous != answer_id,
            None => true,
        }
    }

    pub fn answer_for(&self, question_id: &QuestionId) -> Option<AnswerId> {
        self.selected.get(question_id).copied()
    }

    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.selected.contains_key(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::SelectionMap;

    #[test]
    fn latest_selection_wins() {
        let mut map = SelectionMap::new();
        let q = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(map.select(q, a));
        assert!(map.select(q, b));
        assert_eq!(map.answer_for(&q), Some(b));
        assert_eq!(map.answered_count(), 1);
    }

    #[test]
    fn reselecting_is_not_a_toggle() {
        let mut map = SelectionMap::new();
        let q = Uuid::new_v4();
        let a = Uuid::new_v4();

        map.select(q, a);
        assert!(!map.select(q, a));
        assert_eq!(map.answer_for(&q), Some(a));
        assert!(map.is_answered(&q));
    }

    #[test]
    fn one_answer_per_question_over_many_calls() {
        let mut map = SelectionMap::new();
        let questions: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let answers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let mut last = std::collections::HashMap::new();
        for step in 0..40 {
            let q = questions[step % questions.len()];
            let a = answers[(step * 7) % answers.len()];
            map.select(q, a);
            last.insert(q, a);
        }

        assert_eq!(map.answered_count(), questions.len());
        for (q, a) in last {
            assert_eq!(map.answer_for(&q), Some(a));
        }
    }
}
