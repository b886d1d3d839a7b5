use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct DueDate(OffsetDateTime);

impl DueDate {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }

    pub fn is_passed(&self, now: &OffsetDateTime) -> bool {
        now > &self.0
    }

    /// Whole days elapsed since the due date, never less than one.
    pub fn overdue_days(&self, now: &OffsetDateTime) -> i64 {
        (*now - self.0).whole_days().max(1)
    }
}
