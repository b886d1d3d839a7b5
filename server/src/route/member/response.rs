use crate::controller::Exhaust;
use application::transfer::{MemberDto, PenaltyDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
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
pub struct PenaltyResponse {
    #[serde(with = "time::serde::rfc3339")]
    starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    ends_at: OffsetDateTime,
    reason: String,
}

impl From<PenaltyDto> for PenaltyResponse {
    fn from(value: PenaltyDto) -> Self {
        Self {
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            reason: value.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    id: Uuid,
    name: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    penalty: Option<PenaltyResponse>,
}

impl IntoResponse for MemberResponse {
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

impl Exhaust<MemberDto> for Presenter {
    type To = MemberResponse;
    fn emit(&self, input: MemberDto) -> Self::To {
        MemberResponse {
            id: input.id,
            name: input.name,
            status: input.status.as_str(),
            penalty: input.penalty.map(PenaltyResponse::from),
        }
    }
}
