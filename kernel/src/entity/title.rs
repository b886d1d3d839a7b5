mod author;
mod id;
mod name;

pub use self::{author::*, id::*, name::*};
use crate::entity::{BookCopy, CopyCollection, CopyId, MemberId, ReservationId, ReservationQueue};
use crate::policy::{LoanPolicy, ReservationPolicy};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use time::{Duration, OffsetDateTime};
use vodca::References;

/// Upper bound on copies created by a single registration or restock.
pub const MAX_COPIES_PER_REQUEST: i32 = 1000;

/// A catalogued work together with its physical copies and reservation queue.
///
/// Every change to a copy or a reservation goes through this aggregate so the
/// hand-off between returns and the queue cannot drift apart.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Title {
    id: TitleId,
    name: TitleName,
    author: TitleAuthor,
    copies: CopyCollection,
    reservations: ReservationQueue,
}

impl Title {
    pub fn new(
        id: TitleId,
        name: TitleName,
        author: TitleAuthor,
        copies: CopyCollection,
        reservations: ReservationQueue,
    ) -> Self {
        Self {
            id,
            name,
            author,
            copies,
            reservations,
        }
    }

    pub fn register(
        id: TitleId,
        name: TitleName,
        author: TitleAuthor,
        initial_count: i32,
    ) -> error_stack::Result<Self, KernelError> {
        if initial_count < 1 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("a title needs at least one initial copy"));
        }
        let mut title = Self::new(
            id,
            name,
            author,
            CopyCollection::default(),
            ReservationQueue::default(),
        );
        title.add_copies(initial_count)?;
        Ok(title)
    }

    pub fn add_copies(&mut self, count: i32) -> error_stack::Result<(), KernelError> {
        if count < 1 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("at least one copy must be added"));
        }
        if count > MAX_COPIES_PER_REQUEST {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "at most {MAX_COPIES_PER_REQUEST} copies can be added at once, got {count}"
            )));
        }
        for _ in 0..count {
            self.copies
                .add(BookCopy::available(CopyId::generate(), self.id.clone()));
        }
        Ok(())
    }

    pub fn register_copy(&mut self, copy: BookCopy) -> error_stack::Result<(), KernelError> {
        if copy.title_id() != &self.id {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "copy {} belongs to another title",
                copy.id().as_ref()
            )));
        }
        self.copies.add(copy);
        Ok(())
    }

    /// Admits the member into the queue, but only while no copy can be lent
    /// right away.
    pub fn try_reserve<P: ReservationPolicy + ?Sized>(
        &mut self,
        member_id: &MemberId,
        policy: &P,
        now: &OffsetDateTime,
    ) -> error_stack::Result<bool, KernelError> {
        if !self.copies.all_loaned()? {
            return Ok(false);
        }
        Ok(self
            .reservations
            .try_reserve(&self.id, member_id, policy.max_queue_size(), now))
    }

    pub fn release_expired_holds(&mut self, now: &OffsetDateTime) -> Vec<CopyId> {
        let released = self.reservations.release_expired_holds(now);
        self.copies.restore_all_to_available(&released);
        released
    }

    /// Serves the queue from whatever copies are sitting on the shelf.
    /// Expired holds are reclaimed first so their copies go to the next in line.
    pub fn assign_hold_if_reservation_exists(
        &mut self,
        hold_duration: &Duration,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Vec<ReservationId>, KernelError> {
        self.release_expired_holds(now);

        let mut assigned = Vec::new();
        while let Some(copy_id) = self.copies.first_available().map(|copy| copy.id().clone()) {
            let Some(reservation_id) = self
                .reservations
                .assign_hold_to_head(&copy_id, hold_duration, now)?
            else {
                break;
            };
            self.copy_mut(&copy_id)?.assign_hold()?;
            assigned.push(reservation_id);
        }
        Ok(assigned)
    }

    /// Picks the copy a member walks out with.
    ///
    /// A copy on hold is only handed to the member whose reservation holds it;
    /// without an explicit request the member's own hold wins over the shelf.
    /// Borrowing any other copy settles the member's own reservation, and the
    /// copy it held is put back on the shelf for the caller to re-offer.
    pub fn checkout<P: LoanPolicy + ?Sized>(
        &mut self,
        member_id: &MemberId,
        requested: Option<&CopyId>,
        policy: &P,
        now: &OffsetDateTime,
    ) -> error_stack::Result<CopyId, KernelError> {
        let copy_id = match requested {
            Some(copy_id) => copy_id.clone(),
            None => match self.reservations.find_hold_of(member_id) {
                Some(reservation) => reservation.held_copy_id().cloned().ok_or_else(|| {
                    Report::new(KernelError::Internal)
                        .attach_printable("hold-ready reservation without a copy")
                })?,
                None => policy
                    .select_copy(&self.copies)
                    .map(|copy| copy.id().clone())
                    .ok_or_else(|| {
                        Report::new(KernelError::InvalidState)
                            .attach_printable("no copy of this title is available")
                    })?,
            },
        };

        let on_hold = self
            .copies
            .find(&copy_id)
            .ok_or_else(|| {
                Report::new(KernelError::NotFound).attach_printable(format!(
                    "copy {} is not part of this title",
                    copy_id.as_ref()
                ))
            })?
            .is_on_hold();

        if on_hold {
            let reservation = self
                .reservations
                .find_collectible_mut(member_id, &copy_id)
                .ok_or_else(|| {
                    Report::new(KernelError::InvalidState).attach_printable(format!(
                        "copy {} is on hold for another member",
                        copy_id.as_ref()
                    ))
                })?;
            reservation.complete(now)?;
            self.copy_mut(&copy_id)?.collect_hold()?;
        } else {
            self.loan_copy(&copy_id)?;
            // The member no longer waits; a copy held for them goes back to the shelf.
            if let Some(released) = self.reservations.fulfil_elsewhere(member_id) {
                self.copies.restore_all_to_available(&[released]);
            }
        }
        Ok(copy_id)
    }

    pub(in crate::entity) fn loan_copy(
        &mut self,
        copy_id: &CopyId,
    ) -> error_stack::Result<(), KernelError> {
        self.copy_mut(copy_id)?.loan()
    }

    pub fn return_copy(
        &mut self,
        copy_id: &CopyId,
        has_reservation: bool,
    ) -> error_stack::Result<(), KernelError> {
        self.copy_mut(copy_id)?.return_book(has_reservation)
    }

    pub fn has_active_reservation_by_other_member(&self, member_id: &MemberId) -> bool {
        self.reservations.has_active_by_other_member(member_id)
    }

    fn copy_mut(&mut self, copy_id: &CopyId) -> error_stack::Result<&mut BookCopy, KernelError> {
        self.copies.find_mut(copy_id).ok_or_else(|| {
            Report::new(KernelError::NotFound).attach_printable(format!(
                "copy {} is not part of title {}",
                copy_id.as_ref(),
                self.id.as_ref()
            ))
        })
    }
}
