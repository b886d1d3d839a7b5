use crate::controller::Exhaust;
use crate::route::reservation::ReservationResponse;
use application::transfer::{CopyDto, SweepResultDto, TitleDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: Uuid,
}

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    id: Uuid,
    status: &'static str,
}

impl From<CopyDto> for CopyResponse {
    fn from(value: CopyDto) -> Self {
        Self {
            id: value.id,
            status: value.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    id: Uuid,
    name: String,
    author: String,
    copies: Vec<CopyResponse>,
    reservations: Vec<ReservationResponse>,
}

impl From<TitleDto> for TitleResponse {
    fn from(value: TitleDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            author: value.author,
            copies: value.copies.into_iter().map(CopyResponse::from).collect(),
            reservations: value
                .reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
        }
    }
}

impl IntoResponse for TitleResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    released_copies: Vec<Uuid>,
    new_holds: Vec<i64>,
}

impl IntoResponse for SweepResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<Uuid> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse { id: input }
    }
}

impl Exhaust<TitleDto> for Presenter {
    type To = TitleResponse;
    fn emit(&self, input: TitleDto) -> Self::To {
        TitleResponse::from(input)
    }
}

impl Exhaust<Vec<TitleDto>> for Presenter {
    type To = axum::Json<Vec<TitleResponse>>;
    fn emit(&self, input: Vec<TitleDto>) -> Self::To {
        axum::Json(input.into_iter().map(TitleResponse::from).collect())
    }
}

impl Exhaust<SweepResultDto> for Presenter {
    type To = SweepResponse;
    fn emit(&self, input: SweepResultDto) -> Self::To {
        SweepResponse {
            released_copies: input.released_copies,
            new_holds: input.new_holds,
        }
    }
}
