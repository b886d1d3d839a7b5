use kernel::prelude::entity::{DestructMember, DestructPenalty, Member, MemberStatus, Penalty};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MemberDto {
    pub id: Uuid,
    pub name: String,
    pub status: MemberStatus,
    pub penalty: Option<PenaltyDto>,
}

impl From<Member> for MemberDto {
    fn from(value: Member) -> Self {
        let DestructMember {
            id,
            name,
            status,
            penalty,
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            name: name.as_ref().to_owned(),
            status,
            penalty: penalty.map(PenaltyDto::from),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PenaltyDto {
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    pub reason: String,
}

impl From<Penalty> for PenaltyDto {
    fn from(value: Penalty) -> Self {
        let DestructPenalty {
            starts_at,
            ends_at,
            reason,
        } = value.into_destruct();
        Self {
            starts_at,
            ends_at,
            reason,
        }
    }
}

pub struct RegisterMemberDto {
    pub name: String,
}

pub struct GetMemberDto {
    pub id: Uuid,
}
