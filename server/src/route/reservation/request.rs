use crate::controller::Intake;
use application::transfer::{GetReservationsDto, ReserveDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    member_id: Uuid,
    title_id: Uuid,
}

#[derive(Debug)]
pub struct GetReservationsRequest {
    title_id: Uuid,
}

impl GetReservationsRequest {
    pub fn new(title_id: Uuid) -> Self {
        Self { title_id }
    }
}

pub struct Transformer;

impl Intake<ReserveRequest> for Transformer {
    type To = ReserveDto;
    fn emit(&self, input: ReserveRequest) -> Self::To {
        ReserveDto {
            member_id: input.member_id,
            title_id: input.title_id,
        }
    }
}

impl Intake<GetReservationsRequest> for Transformer {
    type To = GetReservationsDto;
    fn emit(&self, input: GetReservationsRequest) -> Self::To {
        GetReservationsDto {
            title_id: input.title_id,
        }
    }
}
