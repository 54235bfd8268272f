pub mod cli;
pub mod config;
pub mod connection;
pub mod fetch;
pub mod listing;
pub mod logger;
pub mod mirror;
pub mod model;

mod api;

pub use api::{AdoMirror, AdoMirrorBuilder, BuildError, DataSource};
