// 🗄️ Record Store - fixed, ordered, immutable sequences of records
//
// Stores are built once at start-up (from the embedded fixtures or from a
// configured data directory) and only ever handed out by shared reference.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::entities::{Expense, Task};
use crate::error::{Error, Result};

const EXPENSES_FIXTURE: &str = include_str!("../fixtures/expenses.json");
const TASKS_FIXTURE: &str = include_str!("../fixtures/tasks.json");

/// A record that can live in a [`RecordStore`]
pub trait Record: DeserializeOwned {
    /// Store name used in errors and logs
    const STORE: &'static str;

    /// Embedded seed data (JSON array)
    const FIXTURE: &'static str;

    /// File looked up inside a configured data directory
    const FILE_NAME: &'static str;

    fn id(&self) -> u32;

    /// Per-record invariants beyond what the type system enforces
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

impl Record for Expense {
    const STORE: &'static str = "expense";
    const FIXTURE: &'static str = EXPENSES_FIXTURE;
    const FILE_NAME: &'static str = "expenses.json";

    fn id(&self) -> u32 {
        self.id
    }

    fn check(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(Error::NegativeAmount { id: self.id });
        }
        Ok(())
    }
}

impl Record for Task {
    const STORE: &'static str = "task";
    const FIXTURE: &'static str = TASKS_FIXTURE;
    const FILE_NAME: &'static str = "tasks.json";

    fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T: Record> RecordStore<T> {
    /// Build a store, rejecting duplicate ids and invalid records
    pub fn from_records(records: Vec<T>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(Error::DuplicateId {
                    store: T::STORE,
                    id: record.id(),
                });
            }
            record.check()?;
        }
        Ok(Self { records })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<T> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// The seed data compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(T::FIXTURE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `data_dir` when it holds this store's file, else the embedded seed
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let store = match data_dir.map(|dir| dir.join(T::FILE_NAME)) {
            Some(path) if path.exists() => {
                tracing::info!(
                    store = T::STORE,
                    path = %path.display(),
                    "loading records from file"
                );
                Self::from_file(&path)?
            }
            _ => Self::embedded()?,
        };
        tracing::debug!(store = T::STORE, count = store.len(), "record store ready");
        Ok(store)
    }
}

impl<T> RecordStore<T> {
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn get(&self, id: u32) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a RecordStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub type ExpenseStore = RecordStore<Expense>;
pub type TaskStore = RecordStore<Task>;

/// Both stores, loaded together
#[derive(Debug, Clone)]
pub struct Household {
    pub expenses: ExpenseStore,
    pub tasks: TaskStore,
}

impl Household {
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        Ok(Self {
            expenses: ExpenseStore::load(data_dir)?,
            tasks: TaskStore::load(data_dir)?,
        })
    }

    pub fn embedded() -> Result<Self> {
        Self::load(None)
    }
}
