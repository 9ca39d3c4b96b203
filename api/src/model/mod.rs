pub mod area;
pub mod availability;
pub mod conflict;
pub mod reservation;
