pub mod model;
pub mod notification;
pub mod repository;
pub mod service;
