mod collection;
mod id;
mod status;

pub use self::{collection::*, id::*, status::*};
use crate::entity::TitleId;
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

/// One physical, circulating instance of a title.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookCopy {
    id: CopyId,
    title_id: TitleId,
    status: CopyStatus,
}

impl BookCopy {
    pub fn new(id: CopyId, title_id: TitleId, status: CopyStatus) -> Self {
        Self {
            id,
            title_id,
            status,
        }
    }

    pub fn available(id: CopyId, title_id: TitleId) -> Self {
        Self::new(id, title_id, CopyStatus::Available)
    }

    /// Stock that arrives already reserved for someone in the queue.
    pub fn on_hold(id: CopyId, title_id: TitleId) -> Self {
        Self::new(id, title_id, CopyStatus::OnHold)
    }

    pub fn loan(&mut self) -> error_stack::Result<(), KernelError> {
        match self.status {
            CopyStatus::Available => {
                self.status = CopyStatus::Loaned;
                Ok(())
            }
            CopyStatus::Loaned => Err(Report::new(KernelError::InvalidState)
                .attach_printable(format!("copy {} is already loaned", self.id.as_ref()))),
            CopyStatus::OnHold => Err(Report::new(KernelError::InvalidState).attach_printable(
                format!("copy {} is on hold for another member", self.id.as_ref()),
            )),
        }
    }

    pub fn return_book(&mut self, has_reservation: bool) -> error_stack::Result<(), KernelError> {
        match self.status {
            CopyStatus::Loaned if has_reservation => {
                self.status = CopyStatus::OnHold;
                Ok(())
            }
            CopyStatus::Loaned => {
                self.status = CopyStatus::Available;
                Ok(())
            }
            CopyStatus::Available | CopyStatus::OnHold => {
                Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                    "copy {} is not loaned and cannot be returned",
                    self.id.as_ref()
                )))
            }
        }
    }

    pub fn assign_hold(&mut self) -> error_stack::Result<(), KernelError> {
        match self.status {
            CopyStatus::Available => {
                self.status = CopyStatus::OnHold;
                Ok(())
            }
            CopyStatus::Loaned | CopyStatus::OnHold => {
                Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                    "copy {} must be available to be put on hold",
                    self.id.as_ref()
                )))
            }
        }
    }

    /// Hands a held copy to the member it was held for. Callers must have
    /// matched the reservation first; see `Title::checkout`.
    pub(in crate::entity) fn collect_hold(&mut self) -> error_stack::Result<(), KernelError> {
        match self.status {
            CopyStatus::OnHold => {
                self.status = CopyStatus::Loaned;
                Ok(())
            }
            CopyStatus::Available | CopyStatus::Loaned => {
                Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                    "copy {} is not on hold",
                    self.id.as_ref()
                )))
            }
        }
    }

    pub fn restore_to_available(&mut self) {
        self.status = CopyStatus::Available;
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, CopyStatus::Available)
    }

    pub fn is_loaned(&self) -> bool {
        matches!(self.status, CopyStatus::Loaned)
    }

    pub fn is_on_hold(&self) -> bool {
        matches!(self.status, CopyStatus::OnHold)
    }
}
