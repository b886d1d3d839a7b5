mod request;
mod response;

use self::request::{CreateRequest, GetLoansRequest, GetRequest, Transformer as MemberTransformer};
use self::response::Presenter as MemberPresenter;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::loan::LoanPresenter;
use application::service::{GetLoanService, GetMemberService, RegisterMemberService};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait MemberRouter {
    fn route_member(self) -> Self;
}

impl MemberRouter for Router<AppModule> {
    fn route_member(self) -> Self {
        self.route(
            "/members",
            post(
                |State(module): State<AppModule>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.register_member(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/members/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_member(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/members/:id/loans",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(MemberTransformer, LoanPresenter)
                        .intake(GetLoansRequest::new(id))
                        .handle(|dto| async move { module.get_loans_of_member(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
