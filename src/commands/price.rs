//! Price command implementation

use crate::alerts::normalize_symbol;
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, PriceEntry, PriceList};
use crate::config::Config;
use crate::error::Result;
use crate::price::{HttpPriceFetcher, PriceSource};

/// Execute the price command
pub fn run_price(symbols: &[String], config: &Config, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let fetcher = HttpPriceFetcher::new(config.price_fetcher_config())?;
    let prices = lookup(&fetcher, symbols);

    let list = PriceList {
        currency: fetcher.config().vs_currency.clone(),
        prices,
    };
    print_output(&list, format)?;
    Ok(())
}

fn lookup(source: &dyn PriceSource, symbols: &[String]) -> Vec<PriceEntry> {
    symbols
        .iter()
        .map(|raw| {
            let result = normalize_symbol(raw)
                .map_err(|e| e.to_string())
                .and_then(|symbol| {
                    source
                        .fetch(&symbol)
                        .map(|price| (symbol, price))
                        .map_err(|e| e.to_string())
                });

            match result {
                Ok((symbol, price)) => PriceEntry {
                    symbol,
                    price: Some(price),
                    error: None,
                },
                Err(error) => {
                    log::warn!("Price lookup for '{}' failed: {}", raw, error);
                    PriceEntry {
                        symbol: raw.clone(),
                        price: None,
                        error: Some(error),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPriceSource;

    #[test]
    fn test_lookup_mixes_hits_and_misses() {
        let source = MockPriceSource::new().with_price("bitcoin", 65000.0);
        let entries = lookup(
            &source,
            &["Bitcoin".to_string(), "nosuchcoin".to_string(), " ".to_string()],
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].symbol, "bitcoin");
        assert_eq!(entries[0].price, Some(65000.0));
        assert!(entries[1].price.is_none());
        assert!(entries[1].error.is_some());
        assert!(entries[2].error.is_some());
        assert_eq!(source.fetch_count("bitcoin"), 1);
    }
}
