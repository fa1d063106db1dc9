pub mod app;
pub mod config;
pub mod error;
pub mod db {
    pub mod models;
    pub mod repository;
}
pub mod api {
    pub mod bookings;
    pub mod errors;
}
