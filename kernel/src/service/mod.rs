pub mod availability;
pub mod conflict;
pub mod lifecycle;
pub mod policy;
