//! API handlers for the portfolio backend

pub mod auth;
pub mod blog;
pub mod education;
pub mod health;
pub mod projects;
pub mod skills;

pub use health::{api_index, db_health_check, health_check};
