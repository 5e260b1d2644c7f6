//! Scoped key-value persistence for the record collections.

use std::{collections::HashMap, sync::RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use fintrack_domain::{Budget, Goal, Transaction};

use crate::{state::FinanceState, CoreError};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const GOALS_KEY: &str = "goals";

/// Scope used when no user namespace is selected.
pub const DEFAULT_SCOPE: &str = "default";

/// Abstraction over stores holding one text document per `(scope, key)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, scope: &str, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, scope: &str, key: &str) -> Result<(), CoreError>;
}

/// Process-local store, mostly useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(&(scope.to_string(), key.to_string())).cloned())
    }

    fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: &str, key: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }
}

/// Typed access to the three collections of one scope.
pub struct FinanceRepository {
    store: Box<dyn KeyValueStore>,
    scope: String,
}

impl FinanceRepository {
    pub fn new(store: Box<dyn KeyValueStore>, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        let scope = if scope.trim().is_empty() {
            DEFAULT_SCOPE.to_string()
        } else {
            scope
        };
        Self { store, scope }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Loads every collection. Missing or malformed documents load as empty.
    pub fn load_state(&self) -> FinanceState {
        FinanceState::new(
            self.load_collection(TRANSACTIONS_KEY),
            self.load_collection(BUDGETS_KEY),
            self.load_collection(GOALS_KEY),
        )
    }

    pub fn save_state(&self, state: &FinanceState) -> Result<(), CoreError> {
        self.save_transactions(&state.transactions)?;
        self.save_budgets(&state.budgets)?;
        self.save_goals(&state.goals)
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), CoreError> {
        self.save_collection(TRANSACTIONS_KEY, transactions)
    }

    pub fn save_budgets(&self, budgets: &[Budget]) -> Result<(), CoreError> {
        self.save_collection(BUDGETS_KEY, budgets)
    }

    pub fn save_goals(&self, goals: &[Goal]) -> Result<(), CoreError> {
        self.save_collection(GOALS_KEY, goals)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(&self.scope, key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(scope = %self.scope, key, error = %err, "failed to read collection; starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(scope = %self.scope, key, count = items.len(), "loaded collection");
                items
            }
            Err(err) => {
                warn!(scope = %self.scope, key, error = %err, "malformed collection; starting empty");
                Vec::new()
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), CoreError> {
        let json = serde_json::to_string(items)?;
        self.store.set(&self.scope, key, &json)
    }
}
