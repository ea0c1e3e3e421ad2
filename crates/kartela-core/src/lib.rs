//! Kartela Takip Sistemi: room access control and colour-swatch archive
//! tracking over HTTP.

pub mod app;
pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routing;
pub mod services;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use error::KartelaError;
pub use response::ApiResponse;
pub use testing::{TestApp, TestResponse};
