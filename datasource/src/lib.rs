pub mod cache;
pub mod documents;
pub mod fetcher;
pub mod metrics_defs;
pub mod storage;
