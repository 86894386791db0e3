use crate::quiz::error::QuizError;

/// Linear cursor over the question list. `index` stays in `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionNavigator {
    index: usize,
    len: usize,
}

impl QuestionNavigator {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.len > 0 && self.index == self.len - 1
    }

    /// Advances only when the current question is answered and it is not the last one.
    pub fn next(&mut self, current_answered: bool) -> bool {
        if !current_answered || self.is_last() || self.is_empty() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Used by the question grid. Unlike `next` it does not care whether the
    /// current question is answered.
    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= self.len {
            return Err(QuizError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.index = index;
        Ok(())
    }
}
