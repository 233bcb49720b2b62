//! Port traits implemented by adapters.

pub mod backend_port;
pub mod config_port;
pub mod data_port;
pub mod news_port;
pub mod notify_port;
