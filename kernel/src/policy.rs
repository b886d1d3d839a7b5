use error_stack::Report;
use time::{Duration, OffsetDateTime};

use crate::entity::{BookCopy, CopyCollection, DueDate, LoanedAt};
use crate::KernelError;

pub trait LoanPolicy: 'static + Sync + Send {
    fn initial_due_date(&self, loaned_at: &LoanedAt) -> error_stack::Result<DueDate, KernelError>;
    fn extended_due_date(&self, due_date: &DueDate) -> error_stack::Result<DueDate, KernelError>;
    fn select_copy<'a>(&self, copies: &'a CopyCollection) -> Option<&'a BookCopy> {
        copies.first_available()
    }
}

pub trait DependOnLoanPolicy: 'static + Sync + Send {
    type LoanPolicy: LoanPolicy;
    fn loan_policy(&self) -> &Self::LoanPolicy;
}

pub trait ReservationPolicy: 'static + Sync + Send {
    fn max_queue_size(&self) -> usize;
    fn hold_duration(&self) -> Duration;
}

pub trait DependOnReservationPolicy: 'static + Sync + Send {
    type ReservationPolicy: ReservationPolicy;
    fn reservation_policy(&self) -> &Self::ReservationPolicy;
}

#[derive(Debug, Clone)]
pub struct DefaultLoanPolicy {
    loan_period: Duration,
    extension: Duration,
}

impl DefaultLoanPolicy {
    pub fn new(loan_period: Duration, extension: Duration) -> Self {
        Self {
            loan_period,
            extension,
        }
    }
}

impl Default for DefaultLoanPolicy {
    fn default() -> Self {
        Self::new(Duration::days(7), Duration::days(7))
    }
}

impl LoanPolicy for DefaultLoanPolicy {
    fn initial_due_date(&self, loaned_at: &LoanedAt) -> error_stack::Result<DueDate, KernelError> {
        shift(loaned_at.as_ref(), &self.loan_period).map(DueDate::new)
    }

    fn extended_due_date(&self, due_date: &DueDate) -> error_stack::Result<DueDate, KernelError> {
        shift(due_date.as_ref(), &self.extension).map(DueDate::new)
    }
}

/// `at + by`, failing instead of panicking when the result leaves the
/// representable calendar.
pub(crate) fn shift(
    at: &OffsetDateTime,
    by: &Duration,
) -> error_stack::Result<OffsetDateTime, KernelError> {
    at.checked_add(*by).ok_or_else(|| {
        Report::new(KernelError::Validation)
            .attach_printable(format!("{at} + {by} is out of the supported date range"))
    })
}

#[derive(Debug, Clone)]
pub struct DefaultReservationPolicy {
    max_queue_size: usize,
    hold_duration: Duration,
}

impl DefaultReservationPolicy {
    pub fn new(max_queue_size: usize, hold_duration: Duration) -> Self {
        Self {
            max_queue_size,
            hold_duration,
        }
    }
}

impl Default for DefaultReservationPolicy {
    fn default() -> Self {
        Self::new(3, Duration::days(3))
    }
}

impl ReservationPolicy for DefaultReservationPolicy {
    fn max_queue_size(&self) -> usize {
        self.max_queue_size
    }

    fn hold_duration(&self) -> Duration {
        self.hold_duration
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::Duration;

    use crate::entity::{DueDate, LoanedAt};
    use crate::policy::{
        DefaultLoanPolicy, DefaultReservationPolicy, LoanPolicy, ReservationPolicy,
    };
    use crate::KernelError;

    #[test]
    fn default_loan_runs_a_week_and_extends_a_week() {
        let policy = DefaultLoanPolicy::default();
        let due = policy
            .initial_due_date(&LoanedAt::new(datetime!(2025-11-18 10:00 UTC)))
            .unwrap();
        assert_eq!(due, DueDate::new(datetime!(2025-11-25 10:00 UTC)));
        assert_eq!(
            policy.extended_due_date(&due).unwrap(),
            DueDate::new(datetime!(2025-12-02 10:00 UTC))
        );
    }

    #[test]
    fn due_date_past_the_calendar_is_rejected() {
        let policy = DefaultLoanPolicy::new(Duration::days(1_000_000_000), Duration::days(7));
        let error = policy
            .initial_due_date(&LoanedAt::new(datetime!(2025-11-18 10:00 UTC)))
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));

        let error = DefaultLoanPolicy::new(Duration::days(7), Duration::days(1_000_000_000))
            .extended_due_date(&DueDate::new(datetime!(2025-11-25 10:00 UTC)))
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));
    }

    #[test]
    fn default_reservation_limits() {
        let policy = DefaultReservationPolicy::default();
        assert_eq!(policy.max_queue_size(), 3);
        assert_eq!(policy.hold_duration(), Duration::days(3));
    }
}
