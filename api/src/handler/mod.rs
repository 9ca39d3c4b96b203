pub mod area;
pub mod health;
pub mod reservation;
