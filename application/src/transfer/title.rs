use kernel::prelude::entity::{
    BookCopy, CopyStatus, DestructBookCopy, DestructReservation, DestructTitle, Reservation,
    ReservationPhase, Title,
};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TitleDto {
    pub id: Uuid,
    pub name: String,
    pub author: String,
    pub copies: Vec<CopyDto>,
    pub reservations: Vec<ReservationDto>,
}

impl From<Title> for TitleDto {
    fn from(value: Title) -> Self {
        let DestructTitle {
            id,
            name,
            author,
            copies,
            reservations,
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            name: name.as_ref().to_owned(),
            author: author.as_ref().to_owned(),
            copies: Vec::<BookCopy>::from(copies)
                .into_iter()
                .map(CopyDto::from)
                .collect(),
            reservations: Vec::<Reservation>::from(reservations)
                .into_iter()
                .map(ReservationDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CopyDto {
    pub id: Uuid,
    pub status: CopyStatus,
}

impl From<BookCopy> for CopyDto {
    fn from(value: BookCopy) -> Self {
        let DestructBookCopy { id, status, .. } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReservationDto {
    pub id: i64,
    pub member_id: Uuid,
    pub status: ReservationPhase,
    pub reserved_at: OffsetDateTime,
    pub held_copy_id: Option<Uuid>,
    pub hold_until: Option<OffsetDateTime>,
}

impl From<Reservation> for ReservationDto {
    fn from(value: Reservation) -> Self {
        let held_copy_id = value.held_copy_id().map(|copy_id| *copy_id.as_ref());
        let hold_until = value.hold_until().map(|hold_until| *hold_until.as_ref());
        let DestructReservation {
            id,
            member_id,
            status,
            reserved_at,
            ..
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            member_id: *member_id.as_ref(),
            status: status.phase(),
            reserved_at: *reserved_at.as_ref(),
            held_copy_id,
            hold_until,
        }
    }
}

pub struct RegisterTitleDto {
    pub name: String,
    pub author: String,
    pub initial_count: i32,
}

pub struct AddCopiesDto {
    pub title_id: Uuid,
    pub count: i32,
}

pub struct GetTitleDto {
    pub id: Uuid,
}

pub struct GetTitlesDto {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct SweepHoldsDto {
    pub title_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct SweepResultDto {
    pub released_copies: Vec<Uuid>,
    pub new_holds: Vec<i64>,
}
