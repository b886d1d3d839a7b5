mod id;
mod name;
mod penalty;
mod status;

pub use self::{id::*, name::*, penalty::*, status::*};
use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Member {
    id: MemberId,
    name: MemberName,
    status: MemberStatus,
    penalty: Option<Penalty>,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: MemberName,
        status: MemberStatus,
        penalty: Option<Penalty>,
    ) -> Self {
        Self {
            id,
            name,
            status,
            penalty,
        }
    }

    pub fn create(id: MemberId, name: MemberName) -> Self {
        Self::new(id, name, MemberStatus::Active, None)
    }

    /// Replaces any previous penalty.
    pub fn apply_penalty(&mut self, penalty: Penalty) {
        self.penalty = Some(penalty);
        self.status = MemberStatus::Suspended;
    }

    pub fn release_penalty_if_expired(&mut self, now: &OffsetDateTime) {
        let Some(penalty) = &self.penalty else {
            return;
        };
        if !penalty.is_active(now) {
            self.penalty = None;
            self.status = MemberStatus::Active;
        }
    }

    /// Reflects the cached status only; call `release_penalty_if_expired` first.
    pub fn can_borrow(&self) -> bool {
        match self.status {
            MemberStatus::Active => true,
            MemberStatus::Suspended => false,
        }
    }

    pub fn has_penalty(&self) -> bool {
        self.penalty.is_some()
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::entity::{Member, MemberId, MemberName, MemberStatus, Penalty};

    fn member() -> Member {
        Member::create(
            MemberId::new(Uuid::new_v4()),
            MemberName::new("Ada").unwrap(),
        )
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(MemberName::new("  ").is_err());
    }

    #[test]
    fn new_member_can_borrow() {
        let member = member();
        assert!(member.can_borrow());
        assert!(!member.has_penalty());
    }

    #[test]
    fn penalty_suspends_until_window_closes() {
        let mut member = member();
        member.apply_penalty(Penalty::for_overdue(&datetime!(2025-01-10 0:00 UTC), 2));
        assert_eq!(member.status(), &MemberStatus::Suspended);
        assert!(!member.can_borrow());

        member.release_penalty_if_expired(&datetime!(2025-01-11 23:59 UTC));
        assert!(!member.can_borrow());

        member.release_penalty_if_expired(&datetime!(2025-01-12 0:00 UTC));
        assert!(member.can_borrow());
        assert!(member.penalty().is_none());
    }

    #[test]
    fn penalty_is_replaced_wholesale() {
        let mut member = member();
        member.apply_penalty(Penalty::for_overdue(&datetime!(2025-01-10 0:00 UTC), 5));
        member.apply_penalty(Penalty::for_overdue(&datetime!(2025-01-10 0:00 UTC), 1));
        assert_eq!(
            member.penalty().as_ref().unwrap().ends_at(),
            &datetime!(2025-01-11 0:00 UTC)
        );
    }

    #[test]
    fn release_without_penalty_is_a_no_op() {
        let mut member = member();
        member.release_penalty_if_expired(&datetime!(2025-01-10 0:00 UTC));
        assert!(member.can_borrow());
    }
}
