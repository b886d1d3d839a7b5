use crate::controller::Exhaust;
use application::transfer::ReservationDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::ReservationPhase;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    id: i64,
    member_id: Uuid,
    status: ReservationPhase,
    #[serde(with = "time::serde::rfc3339")]
    reserved_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    held_copy_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    hold_until: Option<OffsetDateTime>,
}

impl From<ReservationDto> for ReservationResponse {
    fn from(value: ReservationDto) -> Self {
        Self {
            id: value.id,
            member_id: value.member_id,
            status: value.status,
            reserved_at: value.reserved_at,
            held_copy_id: value.held_copy_id,
            hold_until: value.hold_until,
        }
    }
}

pub struct CreatedReservation(ReservationResponse);

impl IntoResponse for CreatedReservation {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self.0)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<ReservationDto> for Presenter {
    type To = CreatedReservation;
    fn emit(&self, input: ReservationDto) -> Self::To {
        CreatedReservation(ReservationResponse::from(input))
    }
}

impl Exhaust<Vec<ReservationDto>> for Presenter {
    type To = axum::Json<Vec<ReservationResponse>>;
    fn emit(&self, input: Vec<ReservationDto>) -> Self::To {
        axum::Json(input.into_iter().map(ReservationResponse::from).collect())
    }
}
