// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use config::{AppState, Config};
pub use router::create_router;
