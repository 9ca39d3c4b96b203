pub mod area;
pub mod id;
pub mod interval;
pub mod notification;
pub mod reservation;
