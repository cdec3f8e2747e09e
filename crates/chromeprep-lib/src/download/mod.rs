#[allow(clippy::module_inception)]
mod download;
mod extract;
mod types;

pub use download::HttpFetcher;
pub use extract::extract_zip;
pub use types::{FetchOptions, Fetcher};
