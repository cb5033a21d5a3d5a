pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod frames;
pub mod logging;
pub mod pages;
pub mod routes;
pub mod types;
