//! Portfolio Backend Library
//!
//! Core modules for the portfolio API server: public content endpoints,
//! admin login, the login rate limiter and the admin access guard.

pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod education;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod projects;
pub mod routes;
pub mod skills;
pub mod state;
pub mod utils;
