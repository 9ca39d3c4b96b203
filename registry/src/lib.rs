use std::sync::Arc;

use adapter::repository::area::AreaRepositoryImpl;
use adapter::repository::notification::NotificationRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::{database::ConnectionPool, repository::health::HealthCheckRepositoryImpl};
use kernel::notification::NotificationEmitter;
use kernel::repository::area::AreaRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::service::availability::AvailabilityEngine;
use kernel::service::conflict::ConflictDetector;
use kernel::service::lifecycle::ReservationLifecycle;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    area_repository: Arc<dyn AreaRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    availability_engine: Arc<AvailabilityEngine>,
    conflict_detector: Arc<ConflictDetector>,
    reservation_lifecycle: Arc<ReservationLifecycle>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let area_repository: Arc<dyn AreaRepository> =
            Arc::new(AreaRepositoryImpl::new(pool.clone()));
        let reservation_repository: Arc<dyn ReservationRepository> =
            Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let notification_emitter: Arc<dyn NotificationEmitter> =
            Arc::new(NotificationRepositoryImpl::new(pool.clone()));
        let availability_engine = Arc::new(AvailabilityEngine::new(
            area_repository.clone(),
            reservation_repository.clone(),
            app_config.reservation.max_availability_range_days,
        ));
        let conflict_detector = Arc::new(ConflictDetector::new(reservation_repository.clone()));
        let reservation_lifecycle = Arc::new(ReservationLifecycle::new(
            area_repository.clone(),
            reservation_repository.clone(),
            notification_emitter,
        ));
        Self {
            health_check_repository,
            area_repository,
            reservation_repository,
            availability_engine,
            conflict_detector,
            reservation_lifecycle,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn area_repository(&self) -> Arc<dyn AreaRepository> {
        self.area_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn availability_engine(&self) -> Arc<AvailabilityEngine> {
        self.availability_engine.clone()
    }

    pub fn conflict_detector(&self) -> Arc<ConflictDetector> {
        self.conflict_detector.clone()
    }

    pub fn reservation_lifecycle(&self) -> Arc<ReservationLifecycle> {
        self.reservation_lifecycle.clone()
    }
}
