mod hold_until;
mod id;
mod queue;
mod reserved_at;
mod status;

pub use self::{hold_until::*, id::*, queue::*, reserved_at::*, status::*};
use crate::entity::{CopyId, MemberId, TitleId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Reservation {
    id: ReservationId,
    title_id: TitleId,
    member_id: MemberId,
    status: ReservationStatus,
    reserved_at: ReservedAt,
}

impl Reservation {
    pub fn new(
        id: ReservationId,
        title_id: TitleId,
        member_id: MemberId,
        status: ReservationStatus,
        reserved_at: ReservedAt,
    ) -> Self {
        Self {
            id,
            title_id,
            member_id,
            status,
            reserved_at,
        }
    }

    pub fn queued(
        id: ReservationId,
        title_id: TitleId,
        member_id: MemberId,
        reserved_at: ReservedAt,
    ) -> Self {
        Self::new(
            id,
            title_id,
            member_id,
            ReservationStatus::Queued,
            reserved_at,
        )
    }

    pub fn prepare_hold(
        &mut self,
        copy_id: CopyId,
        hold_until: HoldUntil,
    ) -> error_stack::Result<(), KernelError> {
        match self.status {
            ReservationStatus::Queued => {
                self.status = ReservationStatus::HoldReady {
                    copy_id,
                    hold_until,
                };
                Ok(())
            }
            ReservationStatus::HoldReady { .. }
            | ReservationStatus::LoanComplete
            | ReservationStatus::Expired => Err(Report::new(KernelError::InvalidState)
                .attach_printable(format!(
                    "reservation {} is not waiting in the queue",
                    self.id.as_ref()
                ))),
        }
    }

    /// Expires an unclaimed hold once its deadline has passed and hands back
    /// the copy it was holding. Any other state is left untouched.
    pub fn expire(&mut self, now: &OffsetDateTime) -> Option<CopyId> {
        let released = match &self.status {
            ReservationStatus::HoldReady {
                copy_id,
                hold_until,
            } if hold_until.has_passed(now) => copy_id.clone(),
            ReservationStatus::Queued
            | ReservationStatus::HoldReady { .. }
            | ReservationStatus::LoanComplete
            | ReservationStatus::Expired => return None,
        };
        self.status = ReservationStatus::Expired;
        Some(released)
    }

    pub fn complete(&mut self, now: &OffsetDateTime) -> error_stack::Result<(), KernelError> {
        match &self.status {
            ReservationStatus::HoldReady { hold_until, .. } if hold_until.has_passed(now) => {
                Err(Report::new(KernelError::InvalidState)
                    .attach_printable(format!("hold of reservation {} expired", self.id.as_ref())))
            }
            ReservationStatus::HoldReady { .. } => {
                self.status = ReservationStatus::LoanComplete;
                Ok(())
            }
            ReservationStatus::Queued
            | ReservationStatus::LoanComplete
            | ReservationStatus::Expired => Err(Report::new(KernelError::InvalidState)
                .attach_printable(format!(
                    "reservation {} has no hold to collect",
                    self.id.as_ref()
                ))),
        }
    }

    /// Closes an active reservation whose member got a copy some other way and
    /// hands back the copy that was held for it, if any.
    pub fn fulfil_elsewhere(&mut self) -> Option<CopyId> {
        let released = match &self.status {
            ReservationStatus::Queued => None,
            ReservationStatus::HoldReady { copy_id, .. } => Some(copy_id.clone()),
            ReservationStatus::LoanComplete | ReservationStatus::Expired => return None,
        };
        self.status = ReservationStatus::LoanComplete;
        released
    }

    pub fn matches_hold(&self, copy_id: &CopyId) -> bool {
        self.held_copy_id() == Some(copy_id)
    }

    pub fn same_member(&self, member_id: &MemberId) -> bool {
        &self.member_id == member_id
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_queued(&self) -> bool {
        matches!(self.status, ReservationStatus::Queued)
    }

    pub fn is_hold_ready(&self) -> bool {
        matches!(self.status, ReservationStatus::HoldReady { .. })
    }

    pub fn held_copy_id(&self) -> Option<&CopyId> {
        match &self.status {
            ReservationStatus::HoldReady { copy_id, .. } => Some(copy_id),
            _ => None,
        }
    }

    pub fn hold_until(&self) -> Option<&HoldUntil> {
        match &self.status {
            ReservationStatus::HoldReady { hold_until, .. } => Some(hold_until),
            _ => None,
        }
    }
}
