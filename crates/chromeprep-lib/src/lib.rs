pub mod cli;
pub mod config;
pub mod download;
pub mod env;
pub mod error;
pub mod output;
pub mod progress;
pub mod resolver;
pub mod revision;
pub mod skip;
pub mod store;
pub mod verification;

pub use config::Config;
pub use error::ChromePrepError;
