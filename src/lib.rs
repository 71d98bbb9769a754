pub mod cli_args;
pub mod config;
pub mod error;
mod extractor;
mod middleware;
mod route;
pub mod server;
mod state;
pub mod store;
pub mod types;
mod utils;
