//! Regional document lookup: one `GET /{key}` endpoint per region, each bound
//! to its own replica of a globally replicated document container.
pub mod config;
pub mod deployment;
pub mod factory;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
