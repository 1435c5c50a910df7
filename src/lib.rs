pub mod app;
pub mod auth;
pub mod bookings;
pub mod config;
pub mod db;
pub mod error;
pub mod hotels;
pub mod memory;
pub mod state;
pub mod users;
