//! 1-based page cursor with bounds-checked navigation.

use crate::error::InvalidNavigationError;
use doc_model::PageIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentCursor {
    current: u32,
    total: u32,
}

impl Default for DocumentCursor {
    fn default() -> Self {
        Self { current: 1, total: 0 }
    }
}

impl DocumentCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the cursor at page 1 of a freshly loaded document.
    pub fn reset(&mut self, total: u32) {
        self.total = total;
        self.current = 1;
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn validate(&self, page: u32) -> Result<u32, InvalidNavigationError> {
        if page < 1 || page > self.total {
            return Err(InvalidNavigationError { requested: page, page_count: self.total });
        }
        Ok(page)
    }

    pub fn move_to(&mut self, page: u32) -> Result<(), InvalidNavigationError> {
        self.current = self.validate(page)?;
        Ok(())
    }

    pub fn next_target(&self) -> u32 {
        self.current.saturating_add(1)
    }

    /// Page 1 yields 0, which `validate` rejects.
    pub fn prev_target(&self) -> u32 {
        self.current.saturating_sub(1)
    }

    pub fn indicator(&self) -> PageIndicator {
        PageIndicator { current: self.current, total: self.total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_page_one_of_nothing() {
        let cursor = DocumentCursor::new();
        assert_eq!(cursor.indicator(), PageIndicator { current: 1, total: 0 });
        assert!(cursor.validate(1).is_err());
    }

    #[test]
    fn move_to_accepts_only_pages_in_range() {
        let mut cursor = DocumentCursor::new();
        cursor.reset(5);

        for page in 1..=5 {
            cursor.move_to(page).expect("page should be in range");
            assert_eq!(cursor.current(), page);
        }

        let err = cursor.move_to(6).expect_err("page 6 is out of range");
        assert_eq!(err, InvalidNavigationError { requested: 6, page_count: 5 });
        assert!(cursor.move_to(0).is_err());
        assert_eq!(cursor.current(), 5);
    }

    #[test]
    fn neighbours_fall_outside_at_the_edges() {
        let mut cursor = DocumentCursor::new();
        cursor.reset(3);

        assert!(cursor.validate(cursor.prev_target()).is_err());

        cursor.move_to(3).expect("page 3 should be in range");
        assert!(cursor.validate(cursor.next_target()).is_err());
        assert_eq!(cursor.validate(cursor.prev_target()), Ok(2));
    }
}
