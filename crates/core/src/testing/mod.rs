//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediaconv_core::testing::MockConverter;
//! use mediaconv_core::format::ConversionCategory;
//!
//! let converter = Arc::new(MockConverter::new(ConversionCategory::Audio));
//! let dispatcher = ConversionDispatcher::from_converters([converter.clone() as Arc<dyn Converter>], 2);
//!
//! dispatcher.convert_file("in.wav", "out.mp3", None).await;
//! assert_eq!(converter.conversion_count().await, 1);
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};
