mod due_date;
mod id;
mod loaned_at;
mod returned_at;

pub use self::{due_date::*, id::*, loaned_at::*, returned_at::*};
use crate::entity::{CopyId, MemberId, Title, TitleId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Loan {
    id: LoanId,
    member_id: MemberId,
    copy_id: CopyId,
    title_id: TitleId,
    loaned_at: LoanedAt,
    due_date: DueDate,
    returned_at: Option<ReturnedAt>,
}

impl Loan {
    pub fn new(
        id: LoanId,
        member_id: MemberId,
        copy_id: CopyId,
        title_id: TitleId,
        loaned_at: LoanedAt,
        due_date: DueDate,
        returned_at: Option<ReturnedAt>,
    ) -> Self {
        Self {
            id,
            member_id,
            copy_id,
            title_id,
            loaned_at,
            due_date,
            returned_at,
        }
    }

    pub fn start(
        id: LoanId,
        member_id: MemberId,
        copy_id: CopyId,
        title_id: TitleId,
        loaned_at: LoanedAt,
        due_date: DueDate,
    ) -> Self {
        Self::new(id, member_id, copy_id, title_id, loaned_at, due_date, None)
    }

    /// Closes the loan and moves the borrowed copy back through its title.
    pub fn return_book(
        &mut self,
        now: &OffsetDateTime,
        title: &mut Title,
        has_reservation: bool,
    ) -> error_stack::Result<(), KernelError> {
        if !self.is_active() {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable(format!("loan {} is already returned", self.id.as_ref())));
        }
        if title.id() != &self.title_id {
            return Err(Report::new(KernelError::Internal).attach_printable(format!(
                "loan {} does not belong to title {}",
                self.id.as_ref(),
                title.id().as_ref()
            )));
        }
        title.return_copy(&self.copy_id, has_reservation)?;
        self.returned_at = Some(ReturnedAt::new(*now));
        Ok(())
    }

    pub fn extend(
        &mut self,
        now: &OffsetDateTime,
        has_reservation: bool,
        new_due_date: DueDate,
    ) -> error_stack::Result<(), KernelError> {
        if !self.is_active() {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("only active loans can be extended"));
        }
        if self.is_overdue(now) {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("overdue loans must be returned, not extended"));
        }
        if has_reservation {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("another member is waiting for this title"));
        }
        self.due_date = new_due_date;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    pub fn is_overdue(&self, now: &OffsetDateTime) -> bool {
        self.is_active() && self.due_date.is_passed(now)
    }
}
