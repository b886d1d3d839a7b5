mod request;
mod response;

pub(in crate::route) use self::request::{
    GetReservationsRequest, Transformer as ReservationTransformer,
};
pub(in crate::route) use self::response::{
    Presenter as ReservationPresenter, ReservationResponse,
};
use self::request::ReserveRequest;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use application::service::ReserveService;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

pub trait ReservationRouter {
    fn route_reservation(self) -> Self;
}

impl ReservationRouter for Router<AppModule> {
    fn route_reservation(self) -> Self {
        self.route(
            "/reservations",
            post(
                |State(module): State<AppModule>, Json(req): Json<ReserveRequest>| async move {
                    Controller::new(ReservationTransformer, ReservationPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.reserve(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
