#[macro_use]
extern crate tracing;

pub mod auth;
pub(crate) mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod repository;
pub mod uri;

pub type Result<T> = std::result::Result<T, error::Error>;
