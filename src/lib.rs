pub mod cli;
pub mod config;
pub mod executor;
pub mod firewall;
pub mod logging;
pub mod snapshot;
