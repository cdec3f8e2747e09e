use crate::download::FetchOptions;
use crate::revision::Revision;
use crate::skip::SkipSource;
use crate::store::FsStore;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InstallParams {
    pub revision: Revision,
    pub store: FsStore,
    pub output_path: PathBuf,
    pub min_major_version: u32,
    pub fetch_options: FetchOptions,
}

#[derive(Debug, Clone)]
pub struct SkipParams {
    pub source: SkipSource,
}

#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub revision: Revision,
    pub store: FsStore,
}
