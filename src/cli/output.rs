//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::alerts::{RegistrationRequest, TickReport};
use crate::cli::args::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

impl TableDisplay for TickReport {
    fn to_table(&self) -> String {
        let mut output = String::from("Check complete\n");
        output.push_str(&format!("  Symbols checked:    {}\n", self.symbols_checked));
        output.push_str(&format!("  Fetch failures:     {}\n", self.fetch_failures));
        output.push_str(&format!("  Breaches:           {}\n", self.breaches));
        output.push_str(&format!("  Notifications sent: {}\n", self.notifications_sent));
        output.push_str(&format!("  Auth failures:      {}\n", self.auth_failures));
        output.push_str(&format!("  Send failures:      {}", self.send_failures));
        output
    }

    fn to_compact(&self) -> String {
        self.to_string()
    }
}

/// One price lookup result
#[derive(Debug, Clone, Serialize)]
pub struct PriceEntry {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableDisplay for PriceEntry {
    fn to_table(&self) -> String {
        match (&self.price, &self.error) {
            (Some(price), _) => format!("{:<16} {}", self.symbol, price),
            (None, Some(err)) => format!("{:<16} unavailable ({})", self.symbol, err),
            (None, None) => format!("{:<16} unavailable", self.symbol),
        }
    }

    fn to_compact(&self) -> String {
        match self.price {
            Some(price) => format!("{}={}", self.symbol, price),
            None => format!("{}=?", self.symbol),
        }
    }
}

/// Price lookup results
#[derive(Debug, Clone, Serialize)]
pub struct PriceList {
    pub currency: String,
    pub prices: Vec<PriceEntry>,
}

impl TableDisplay for PriceList {
    fn to_table(&self) -> String {
        let mut output = format!("{:<16} PRICE ({})\n", "SYMBOL", self.currency.to_uppercase());
        for entry in &self.prices {
            output.push_str(&entry.to_table());
            output.push('\n');
        }
        output
    }

    fn to_compact(&self) -> String {
        self.prices
            .iter()
            .map(|p| p.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Seed rule for display
#[derive(Debug, Clone, Serialize)]
pub struct RuleListEntry {
    pub index: usize,
    pub symbol: String,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub recipient: String,
}

impl RuleListEntry {
    pub fn new(index: usize, request: &RegistrationRequest) -> Self {
        Self {
            index,
            symbol: request.symbol.clone(),
            upper_bound: request.upper_bound,
            lower_bound: request.lower_bound,
            recipient: request.recipient.clone(),
        }
    }
}

impl TableDisplay for RuleListEntry {
    fn to_table(&self) -> String {
        format!(
            "[{}] {} below ${} or above ${} -> {}",
            self.index, self.symbol, self.lower_bound, self.upper_bound, self.recipient
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "{}:{}..{}",
            self.symbol, self.lower_bound, self.upper_bound
        )
    }
}

/// Seed rules for display
#[derive(Debug, Clone, Serialize)]
pub struct RuleList {
    pub path: String,
    pub rules: Vec<RuleListEntry>,
}

impl TableDisplay for RuleList {
    fn to_table(&self) -> String {
        let mut output = format!("Rules file: {}\n", self.path);
        output.push_str(&format!("Rules: {}\n\n", self.rules.len()));

        for rule in &self.rules {
            output.push_str(&rule.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.rules
            .iter()
            .map(|r| r.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_list_table() {
        let list = PriceList {
            currency: "usd".to_string(),
            prices: vec![
                PriceEntry {
                    symbol: "bitcoin".to_string(),
                    price: Some(65000.0),
                    error: None,
                },
                PriceEntry {
                    symbol: "nosuchcoin".to_string(),
                    price: None,
                    error: Some("not listed".to_string()),
                },
            ],
        };

        let output = list.to_table();
        assert!(output.contains("PRICE (USD)"));
        assert!(output.contains("65000"));
        assert!(output.contains("unavailable (not listed)"));
        assert_eq!(list.to_compact(), "bitcoin=65000, nosuchcoin=?");
    }

    #[test]
    fn test_price_entry_json_skips_missing() {
        let entry = PriceEntry {
            symbol: "bitcoin".to_string(),
            price: Some(1.5),
            error: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"symbol": "bitcoin", "price": 1.5}));
    }

    #[test]
    fn test_rule_list_table() {
        let request = RegistrationRequest::new("bitcoin", 70000.0, 60000.0, "a@x.com");
        let list = RuleList {
            path: "rules.toml".to_string(),
            rules: vec![RuleListEntry::new(0, &request)],
        };

        let output = list.to_table();
        assert!(output.contains("Rules: 1"));
        assert!(output.contains("bitcoin below $60000 or above $70000 -> a@x.com"));
    }

    #[test]
    fn test_tick_report_compact() {
        let report = TickReport {
            symbols_checked: 2,
            breaches: 1,
            notifications_sent: 1,
            ..Default::default()
        };
        assert!(report.to_compact().starts_with("2 symbol(s) checked"));
        assert!(report.to_table().contains("Breaches:           1"));
    }

    #[test]
    fn test_message_display() {
        let msg = Message {
            message: "Operation completed".to_string(),
            success: true,
        };

        assert!(msg.to_table().starts_with('✓'));
    }
}
