mod request;
mod response;

use self::request::{
    AddCopiesRequest, CreateRequest, GetAllRequest, GetRequest, SweepRequest,
    Transformer as TitleTransformer,
};
use self::response::Presenter as TitlePresenter;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::reservation::{
    GetReservationsRequest, ReservationPresenter, ReservationTransformer,
};
use application::service::{
    AddCopiesService, GetReservationService, GetTitleService, RegisterTitleService,
    SweepHoldService,
};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait TitleRouter {
    fn route_title(self) -> Self;
}

impl TitleRouter for Router<AppModule> {
    fn route_title(self) -> Self {
        self.route(
            "/titles",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(TitleTransformer, TitlePresenter)
                        .intake(req)
                        .handle(|dto| async move { module.get_titles(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(TitleTransformer, TitlePresenter)
                        .intake(req)
                        .handle(|dto| async move { module.register_title(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/titles/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(TitleTransformer, TitlePresenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_title(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/titles/:id/copies",
            post(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<AddCopiesRequest>| async move {
                    Controller::new(TitleTransformer, TitlePresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.add_copies(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/titles/:id/reservations",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(ReservationTransformer, ReservationPresenter)
                        .intake(GetReservationsRequest::new(id))
                        .handle(|dto| async move { module.get_reservations(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/titles/:id/holds/sweep",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(TitleTransformer, TitlePresenter)
                        .intake(SweepRequest::new(id))
                        .handle(|dto| async move { module.sweep_holds(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
