mod request;
mod response;

use self::request::{
    ExtendRequest, GetRequest, LendRequest, ReturnRequest, Transformer as LoanTransformer,
};
pub(in crate::route) use self::response::Presenter as LoanPresenter;
use self::response::CreatedPresenter;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use application::service::{ExtendService, GetLoanService, LendService, ReturnService};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait LoanRouter {
    fn route_loan(self) -> Self;
}

impl LoanRouter for Router<AppModule> {
    fn route_loan(self) -> Self {
        self.route(
            "/loans",
            post(
                |State(module): State<AppModule>, Json(req): Json<LendRequest>| async move {
                    Controller::new(LoanTransformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.lend(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_loan(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/return",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake(ReturnRequest::new(id))
                        .handle(|dto| async move { module.return_loan(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/extend",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake(ExtendRequest::new(id))
                        .handle(|dto| async move { module.extend_loan(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
