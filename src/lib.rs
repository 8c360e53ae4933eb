// promptgate - Cache-aside prompt gateway
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod remote_config;
pub mod runner;
pub mod server;
pub mod utils;
