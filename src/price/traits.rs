//! Trait definitions for price lookups

use crate::error::FetchError;

/// Source of current asset prices
///
/// Implementations issue a fresh lookup on every call; nothing is cached.
pub trait PriceSource: Send + Sync {
    /// Current price for a normalized symbol
    fn fetch(&self, symbol: &str) -> Result<f64, FetchError>;

    /// Source name for identification in logs
    fn name(&self) -> &str;
}

impl<P: PriceSource + ?Sized> PriceSource for std::sync::Arc<P> {
    fn fetch(&self, symbol: &str) -> Result<f64, FetchError> {
        (**self).fetch(symbol)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
