//! Routing of conversion requests to the converter for their media category.
//!
//! The [`ConversionDispatcher`] detects the source and target formats, checks
//! that they belong to the same category and that a converter accepts the pair,
//! and only then hands the request over. Batches run through a semaphore that
//! bounds how many conversions are in flight.

mod service;
mod types;

pub use service::ConversionDispatcher;
pub use types::ConversionJob;
