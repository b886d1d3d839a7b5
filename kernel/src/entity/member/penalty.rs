use destructure::Destructure;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use vodca::References;

/// Borrowing ban over the half-open window `[starts_at, ends_at)`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Penalty {
    starts_at: OffsetDateTime,
    ends_at: OffsetDateTime,
    reason: String,
}

impl Penalty {
    pub fn new(
        starts_at: impl Into<OffsetDateTime>,
        ends_at: impl Into<OffsetDateTime>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            starts_at: starts_at.into(),
            ends_at: ends_at.into(),
            reason: reason.into(),
        }
    }

    pub fn for_overdue(now: &OffsetDateTime, overdue_days: i64) -> Self {
        let days = overdue_days.max(1);
        let unit = if days == 1 { "day" } else { "days" };
        Self::new(
            *now,
            *now + Duration::days(days),
            format!("overdue by {days} {unit}"),
        )
    }

    pub fn is_active(&self, now: &OffsetDateTime) -> bool {
        &self.starts_at <= now && now < &self.ends_at
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use crate::entity::Penalty;

    #[test]
    fn window_is_half_open() {
        let penalty = Penalty::new(
            datetime!(2025-01-01 0:00 UTC),
            datetime!(2025-01-03 0:00 UTC),
            "overdue",
        );
        assert!(!penalty.is_active(&datetime!(2024-12-31 23:59 UTC)));
        assert!(penalty.is_active(&datetime!(2025-01-01 0:00 UTC)));
        assert!(penalty.is_active(&datetime!(2025-01-02 23:59 UTC)));
        assert!(!penalty.is_active(&datetime!(2025-01-03 0:00 UTC)));
    }

    #[test]
    fn overdue_penalty_lasts_at_least_one_day() {
        let now = datetime!(2025-01-10 12:00 UTC);
        let penalty = Penalty::for_overdue(&now, 0);
        assert_eq!(penalty.ends_at(), &datetime!(2025-01-11 12:00 UTC));
        assert_eq!(penalty.reason(), "overdue by 1 day");

        let penalty = Penalty::for_overdue(&now, 2);
        assert_eq!(penalty.ends_at(), &datetime!(2025-01-12 12:00 UTC));
        assert_eq!(penalty.reason(), "overdue by 2 days");
    }
}
