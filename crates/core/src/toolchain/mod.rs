//! Locating, and if necessary acquiring, the external FFmpeg binary.
//!
//! The [`FfmpegLocator`] is an explicit object owned by whoever builds the
//! converters; there is no process-wide state, so independent locators (for
//! example in tests) never interfere.

mod acquire;
mod config;
mod locator;

pub use acquire::AcquireError;
pub use config::{FfmpegConfig, FALLBACK_DOWNLOAD_URL, PRIMARY_DOWNLOAD_URL};
pub use locator::FfmpegLocator;
