//! Price source abstraction layer
//!
//! Provides a trait over the external price API so evaluation can be tested
//! without network access.

pub mod http;
pub mod retry;
pub mod traits;

pub use http::{parse_price_response, HttpPriceFetcher, PriceFetcherConfig};
pub use retry::RetryPolicy;
pub use traits::PriceSource;
