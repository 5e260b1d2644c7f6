//! Transaction listing and search.

use fintrack_domain::{FlowKind, Transaction};

/// Search criteria for the transaction history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description. Blank matches all.
    pub query: String,
    pub kind: Option<FlowKind>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty() || txn.description.to_lowercase().contains(&query);
        let matches_kind = self.kind.map(|kind| kind == txn.kind).unwrap_or(true);
        matches_query && matches_kind
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Transactions matching `filter`, in stored order.
    pub fn search<'a>(
        transactions: &'a [Transaction],
        filter: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| filter.matches(txn)).collect()
    }
}
