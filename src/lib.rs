pub mod api;
pub mod app;
pub mod climatology;
pub mod config;
pub mod fetch_error;
pub mod power;
pub mod services;
