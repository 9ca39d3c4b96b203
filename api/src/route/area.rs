use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    area::{register_area, show_area, show_area_availability, show_area_conflicts, show_area_list},
    reservation::reserve_area,
};

pub fn build_area_routers() -> Router<AppRegistry> {
    let areas_routers = Router::new()
        .route("/", post(register_area))
        .route("/", get(show_area_list))
        .route("/:area_id", get(show_area))
        .route("/:area_id/availability", get(show_area_availability))
        .route("/:area_id/conflicts", get(show_area_conflicts))
        .route("/:area_id/reservations", post(reserve_area));

    Router::new().nest("/areas", areas_routers)
}
