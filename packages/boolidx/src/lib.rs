pub mod config;
pub mod error;
pub mod indexer;
pub mod interchange;
mod loader;
pub mod logging;
pub mod retrieval;
pub mod store;
pub mod utils;

pub static CONFIG_FILE: &str = "boolidx.json";

pub use config::BoolConfig;
pub use error::{Error, Result};
