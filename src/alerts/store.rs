//! Shared rule store
//!
//! Holds every registered alert rule keyed by normalized symbol. The store is
//! a cheap cloneable handle; all clones see the same rules.

use super::types::{normalize_symbol, AlertRule};
use crate::error::ValidationError;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type RuleMap = BTreeMap<String, Vec<AlertRule>>;

/// Append-only, thread-safe map of symbol to alert rules
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    inner: Arc<RwLock<RuleMap>>,
}

impl RuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule under a symbol
    ///
    /// The symbol is normalized first; on error the store is left untouched.
    /// Bounds were already checked when the [`AlertRule`] was built.
    pub fn register(&self, symbol: &str, rule: AlertRule) -> Result<(), ValidationError> {
        let symbol = normalize_symbol(symbol)?;
        self.write().entry(symbol).or_default().push(rule);
        Ok(())
    }

    /// Point-in-time copy of every rule
    ///
    /// The read lock is released before this returns, so callers may block on
    /// network I/O while iterating the snapshot.
    pub fn snapshot(&self) -> RuleSnapshot {
        RuleSnapshot {
            rules: self.read().clone(),
        }
    }

    /// Total number of registered rules
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Each write is a single push, so a poisoned lock still guards a
    // consistent map.
    fn read(&self) -> RwLockReadGuard<'_, RuleMap> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuleMap> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-only view of the store taken by [`RuleStore::snapshot`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSnapshot {
    rules: RuleMap,
}

impl RuleSnapshot {
    /// Iterate symbols in lexicographic order with their rules
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AlertRule])> {
        self.rules
            .iter()
            .map(|(symbol, rules)| (symbol.as_str(), rules.as_slice()))
    }

    /// Rules for a symbol (normalized lookup)
    pub fn rules_for(&self, symbol: &str) -> &[AlertRule] {
        normalize_symbol(symbol)
            .ok()
            .and_then(|s| self.rules.get(&s))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        !self.rules_for(symbol).is_empty()
    }

    /// Number of tracked symbols
    pub fn symbol_count(&self) -> usize {
        self.rules.len()
    }

    /// Total number of rules across all symbols
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn rule(upper: f64, lower: f64, recipient: &str) -> AlertRule {
        AlertRule::new(upper, lower, recipient).unwrap()
    }

    #[test]
    fn test_register_normalizes_symbol() {
        let store = RuleStore::new();
        store
            .register("  BitCoin", rule(70000.0, 60000.0, "a@x.com"))
            .unwrap();

        let snapshot = store.snapshot();
        assert!(snapshot.contains("bitcoin"));
        assert!(snapshot.contains("BITCOIN"));
        assert_eq!(snapshot.symbol_count(), 1);
    }

    #[test]
    fn test_register_empty_symbol_leaves_store_unchanged() {
        let store = RuleStore::new();
        let result = store.register("", rule(2.0, 1.0, "a@x.com"));
        assert_eq!(result, Err(ValidationError::EmptySymbol));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let store = RuleStore::new();
        store.register("eth", rule(2.0, 1.0, "first@x.com")).unwrap();
        store.register("ETH", rule(4.0, 3.0, "second@x.com")).unwrap();

        let snapshot = store.snapshot();
        let recipients: Vec<_> = snapshot
            .rules_for("eth")
            .iter()
            .map(AlertRule::recipient)
            .collect();
        assert_eq!(recipients, vec!["first@x.com", "second@x.com"]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let store = RuleStore::new();
        store.register("btc", rule(2.0, 1.0, "a@x.com")).unwrap();

        let snapshot = store.snapshot();
        store.register("btc", rule(3.0, 1.0, "b@x.com")).unwrap();
        store.register("eth", rule(3.0, 1.0, "c@x.com")).unwrap();

        assert_eq!(snapshot.rule_count(), 1);
        assert!(!snapshot.contains("eth"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_snapshot_symbols_sorted() {
        let store = RuleStore::new();
        store.register("solana", rule(2.0, 1.0, "a@x.com")).unwrap();
        store.register("bitcoin", rule(2.0, 1.0, "a@x.com")).unwrap();
        store.register("ethereum", rule(2.0, 1.0, "a@x.com")).unwrap();

        let snapshot = store.snapshot();
        let symbols: Vec<_> = snapshot.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["bitcoin", "ethereum", "solana"]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = RuleStore::new();
        let handle = store.clone();
        handle.register("btc", rule(2.0, 1.0, "a@x.com")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_registration() {
        let store = RuleStore::new();
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        let symbol = format!("coin-{}", i % 5);
                        store
                            .register(&symbol, rule(10.0, 1.0, &format!("{}@x.com", t)))
                            .unwrap();
                        let _ = store.snapshot();
                    }
                })
            })
            .collect();

        for handle in threads {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 2000);
        assert_eq!(store.snapshot().symbol_count(), 5);
    }
}
