pub mod area;
pub mod reservation;
