use crate::controller::Exhaust;
use application::transfer::LoanDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    id: Uuid,
    member_id: Uuid,
    copy_id: Uuid,
    title_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    loaned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    due_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    returned_at: Option<OffsetDateTime>,
}

impl From<LoanDto> for LoanResponse {
    fn from(value: LoanDto) -> Self {
        Self {
            id: value.id,
            member_id: value.member_id,
            copy_id: value.copy_id,
            title_id: value.title_id,
            loaned_at: value.loaned_at,
            due_date: value.due_date,
            returned_at: value.returned_at,
        }
    }
}

impl IntoResponse for LoanResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct CreatedLoan(LoanResponse);

impl IntoResponse for CreatedLoan {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self.0)).into_response()
    }
}

/// Renders a loan as-is.
pub struct Presenter;

impl Exhaust<LoanDto> for Presenter {
    type To = LoanResponse;
    fn emit(&self, input: LoanDto) -> Self::To {
        LoanResponse::from(input)
    }
}

impl Exhaust<Vec<LoanDto>> for Presenter {
    type To = axum::Json<Vec<LoanResponse>>;
    fn emit(&self, input: Vec<LoanDto>) -> Self::To {
        axum::Json(input.into_iter().map(LoanResponse::from).collect())
    }
}

/// Renders a freshly started loan with `201 Created`.
pub struct CreatedPresenter;

impl Exhaust<LoanDto> for CreatedPresenter {
    type To = CreatedLoan;
    fn emit(&self, input: LoanDto) -> Self::To {
        CreatedLoan(LoanResponse::from(input))
    }
}
