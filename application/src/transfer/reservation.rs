use uuid::Uuid;

pub struct ReserveDto {
    pub member_id: Uuid,
    pub title_id: Uuid,
}

pub struct GetReservationsDto {
    pub title_id: Uuid,
}
