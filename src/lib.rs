pub mod cli;
pub mod config;
pub mod liveness;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
pub mod units;
