use time::{Duration, OffsetDateTime};

use crate::entity::{
    CopyId, HoldUntil, MemberId, Reservation, ReservationId, ReservedAt, TitleId,
};
use crate::policy::shift;
use crate::KernelError;

/// Reservations of one title, served strictly in `(reserved_at, id)` order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ReservationQueue(Vec<Reservation>);

impl ReservationQueue {
    pub fn new(reservations: impl Into<Vec<Reservation>>) -> Self {
        let mut queue = Self(reservations.into());
        queue.sort();
        queue
    }

    fn sort(&mut self) {
        self.0
            .sort_by(|a, b| (a.reserved_at(), a.id()).cmp(&(b.reserved_at(), b.id())));
    }

    fn next_id(&self) -> ReservationId {
        self.0
            .iter()
            .map(Reservation::id)
            .max()
            .map_or_else(|| ReservationId::new(1), ReservationId::next)
    }

    /// Admits the member at the tail of the queue. Returns `false` when the
    /// member is already waiting or the queue is at capacity.
    pub fn try_reserve(
        &mut self,
        title_id: &TitleId,
        member_id: &MemberId,
        max_queue_size: usize,
        now: &OffsetDateTime,
    ) -> bool {
        if self
            .0
            .iter()
            .any(|reservation| reservation.same_member(member_id) && reservation.is_active())
        {
            return false;
        }
        if self.active_count() >= max_queue_size {
            return false;
        }
        let reservation = Reservation::queued(
            self.next_id(),
            title_id.clone(),
            member_id.clone(),
            ReservedAt::new(*now),
        );
        self.0.push(reservation);
        self.sort();
        true
    }

    pub fn assign_hold_to_head(
        &mut self,
        copy_id: &CopyId,
        hold_duration: &Duration,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Option<ReservationId>, KernelError> {
        let Some(head) = self.0.iter_mut().find(|reservation| reservation.is_queued()) else {
            return Ok(None);
        };
        let hold_until = shift(now, hold_duration)?;
        head.prepare_hold(copy_id.clone(), HoldUntil::new(hold_until))?;
        Ok(Some(head.id().clone()))
    }

    pub fn release_expired_holds(&mut self, now: &OffsetDateTime) -> Vec<CopyId> {
        self.0
            .iter_mut()
            .filter_map(|reservation| reservation.expire(now))
            .collect()
    }

    pub fn find_collectible(&self, member_id: &MemberId, copy_id: &CopyId) -> Option<&Reservation> {
        self.0.iter().find(|reservation| {
            reservation.is_hold_ready()
                && reservation.same_member(member_id)
                && reservation.matches_hold(copy_id)
        })
    }

    pub(in crate::entity) fn find_collectible_mut(
        &mut self,
        member_id: &MemberId,
        copy_id: &CopyId,
    ) -> Option<&mut Reservation> {
        self.0.iter_mut().find(|reservation| {
            reservation.is_hold_ready()
                && reservation.same_member(member_id)
                && reservation.matches_hold(copy_id)
        })
    }

    pub(in crate::entity) fn fulfil_elsewhere(&mut self, member_id: &MemberId) -> Option<CopyId> {
        self.0
            .iter_mut()
            .find(|reservation| reservation.is_active() && reservation.same_member(member_id))?
            .fulfil_elsewhere()
    }

    pub fn find_hold_of(&self, member_id: &MemberId) -> Option<&Reservation> {
        self.0
            .iter()
            .find(|reservation| reservation.is_hold_ready() && reservation.same_member(member_id))
    }

    pub fn head_queued(&self) -> Option<&Reservation> {
        self.0.iter().find(|reservation| reservation.is_queued())
    }

    pub fn has_active_by_other_member(&self, member_id: &MemberId) -> bool {
        self.0
            .iter()
            .any(|reservation| reservation.is_active() && !reservation.same_member(member_id))
    }

    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|reservation| reservation.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.0.iter()
    }
}

impl From<ReservationQueue> for Vec<Reservation> {
    fn from(value: ReservationQueue) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::Duration;
    use uuid::Uuid;

    use crate::entity::{
        CopyId, MemberId, Reservation, ReservationId, ReservationQueue, ReservationStatus,
        ReservedAt, TitleId,
    };
    use crate::KernelError;

    fn member() -> MemberId {
        MemberId::new(Uuid::new_v4())
    }

    #[test]
    fn admission_is_once_per_member_and_bounded() {
        let title_id = TitleId::new(Uuid::new_v4());
        let now = datetime!(2025-01-01 9:00 UTC);
        let mut queue = ReservationQueue::default();

        let first = member();
        assert!(queue.try_reserve(&title_id, &first, 3, &now));
        assert!(!queue.try_reserve(&title_id, &first, 3, &now));
        assert!(queue.try_reserve(&title_id, &member(), 3, &now));
        assert!(queue.try_reserve(&title_id, &member(), 3, &now));
        assert!(!queue.try_reserve(&title_id, &member(), 3, &now));
        assert_eq!(queue.active_count(), 3);
    }

    #[test]
    fn head_is_the_earliest_reservation() {
        let title_id = TitleId::new(Uuid::new_v4());
        let early = member();
        let late = member();
        let mut queue = ReservationQueue::default();
        queue.try_reserve(&title_id, &late, 3, &datetime!(2025-01-02 0:00 UTC));
        queue.try_reserve(&title_id, &early, 3, &datetime!(2025-01-01 0:00 UTC));

        let copy_id = CopyId::generate();
        let now = datetime!(2025-01-03 0:00 UTC);
        let held = queue
            .assign_hold_to_head(&copy_id, &Duration::days(3), &now)
            .unwrap()
            .unwrap();

        let reservation = queue.iter().find(|r| r.id() == &held).unwrap();
        assert!(reservation.same_member(&early));
        assert_eq!(
            reservation.hold_until().unwrap().as_ref(),
            &datetime!(2025-01-06 0:00 UTC)
        );
        assert!(queue.find_collectible(&early, &copy_id).is_some());
        assert!(queue.find_collectible(&late, &copy_id).is_none());
    }

    #[test]
    fn same_instant_reservations_keep_submission_order() {
        let title_id = TitleId::new(Uuid::new_v4());
        let now = datetime!(2025-01-01 0:00 UTC);
        let members = [member(), member(), member()];
        let mut queue = ReservationQueue::default();
        for member_id in &members {
            assert!(queue.try_reserve(&title_id, member_id, 3, &now));
        }

        for member_id in &members {
            let copy_id = CopyId::generate();
            queue
                .assign_hold_to_head(&copy_id, &Duration::days(1), &now)
                .unwrap();
            assert!(queue.find_collectible(member_id, &copy_id).is_some());
        }
    }

    #[test]
    fn loading_restores_fifo_order() {
        let title_id = TitleId::new(Uuid::new_v4());
        let first = member();
        let second = member();
        let queue = ReservationQueue::new(vec![
            Reservation::queued(
                ReservationId::new(2),
                title_id.clone(),
                second,
                ReservedAt::new(datetime!(2025-01-01 0:00 UTC)),
            ),
            Reservation::queued(
                ReservationId::new(1),
                title_id,
                first.clone(),
                ReservedAt::new(datetime!(2025-01-01 0:00 UTC)),
            ),
        ]);
        assert!(queue.head_queued().unwrap().same_member(&first));
    }

    #[test]
    fn no_queued_reservation_means_no_hold() {
        let mut queue = ReservationQueue::default();
        let assigned = queue
            .assign_hold_to_head(
                &CopyId::generate(),
                &Duration::days(3),
                &datetime!(2025-01-01 0:00 UTC),
            )
            .unwrap();
        assert!(assigned.is_none());
    }

    #[test]
    fn expired_holds_release_their_copies() {
        let title_id = TitleId::new(Uuid::new_v4());
        let now = datetime!(2025-01-01 0:00 UTC);
        let mut queue = ReservationQueue::default();
        queue.try_reserve(&title_id, &member(), 3, &now);
        queue.try_reserve(&title_id, &member(), 3, &now);

        let copy_id = CopyId::generate();
        queue
            .assign_hold_to_head(&copy_id, &Duration::days(3), &now)
            .unwrap();

        assert!(queue
            .release_expired_holds(&datetime!(2025-01-03 0:00 UTC))
            .is_empty());
        assert_eq!(
            queue.release_expired_holds(&datetime!(2025-01-05 0:00 UTC)),
            vec![copy_id]
        );
        assert_eq!(queue.active_count(), 1);
        assert!(queue
            .iter()
            .any(|r| r.status() == &ReservationStatus::Expired));
    }

    #[test]
    fn full_queue_accepts_again_after_a_hold_expires() {
        let title_id = TitleId::new(Uuid::new_v4());
        let now = datetime!(2025-01-01 0:00 UTC);
        let mut queue = ReservationQueue::default();
        let head = member();
        assert!(queue.try_reserve(&title_id, &head, 3, &now));
        assert!(queue.try_reserve(&title_id, &member(), 3, &now));
        assert!(queue.try_reserve(&title_id, &member(), 3, &now));

        let fourth = member();
        assert!(!queue.try_reserve(&title_id, &fourth, 3, &now));

        let copy_id = CopyId::generate();
        queue
            .assign_hold_to_head(&copy_id, &Duration::days(3), &now)
            .unwrap();
        assert!(!queue.try_reserve(&title_id, &fourth, 3, &now));

        let later = datetime!(2025-01-05 0:00 UTC);
        assert_eq!(queue.release_expired_holds(&later), vec![copy_id]);
        assert!(queue.try_reserve(&title_id, &fourth, 3, &later));
        assert_eq!(queue.active_count(), 3);
        assert!(queue.find_hold_of(&head).is_none());
    }

    #[test]
    fn hold_past_the_calendar_is_rejected() {
        let title_id = TitleId::new(Uuid::new_v4());
        let now = datetime!(2025-01-01 0:00 UTC);
        let mut queue = ReservationQueue::default();
        queue.try_reserve(&title_id, &member(), 3, &now);

        let error = queue
            .assign_hold_to_head(&CopyId::generate(), &Duration::hours(i64::MAX / 3600), &now)
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));
        assert!(queue.head_queued().is_some());
    }

    #[test]
    fn other_member_reservations_block_only_others() {
        let title_id = TitleId::new(Uuid::new_v4());
        let owner = member();
        let mut queue = ReservationQueue::default();
        queue.try_reserve(&title_id, &owner, 3, &datetime!(2025-01-01 0:00 UTC));

        assert!(!queue.has_active_by_other_member(&owner));
        assert!(queue.has_active_by_other_member(&member()));
    }
}
