pub mod area;
pub mod health;
pub mod reservation;
pub mod v1;
