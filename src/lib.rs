pub mod book;
pub mod catalog;
pub mod cli_args;
pub mod error;
mod extractor;
pub mod levels;
mod middleware;
mod openapi;
pub mod recommend;
mod route;
pub mod server;
pub mod session;
pub mod shelf;
pub mod state;
pub mod traits;
mod upstream;
mod utils;
