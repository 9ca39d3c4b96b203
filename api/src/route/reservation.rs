use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    approve_reservation, cancel_reservation, complete_reservation, reject_reservation,
    show_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/approve", put(approve_reservation))
        .route("/:reservation_id/reject", put(reject_reservation))
        .route("/:reservation_id/cancel", put(cancel_reservation))
        .route("/:reservation_id/complete", put(complete_reservation));

    Router::new().nest("/reservations", reservations_routers)
}
