//! Portal scraper and ingest pipeline for derrick.
//!
//! The write path of the system: read a list of API numbers, fetch each
//! well's detail page from the regulatory portal, assemble a typed record,
//! and upsert it into the store, strictly one identifier at a time with a
//! pause between requests. Every per-identifier failure is logged and
//! skipped; the batch always runs to the end.

pub mod fetch;
pub mod ingest;

pub use fetch::WellFetcher;
pub use ingest::{read_api_numbers, IngestSummary, Ingestor};
