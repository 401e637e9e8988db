// 🔎 Filter Predicate
//
// A filter selection is four independent criteria combined with AND:
// free-text query, category, status, and a secondary classifier (type for
// expenses, priority for tasks). `None` means "all" for every selector.

use serde::Deserialize;
use std::str::FromStr;

use crate::entities::{
    Expense, ExpenseCategory, ExpenseStatus, ExpenseType, Task, TaskCategory, TaskPriority,
    TaskStatus,
};
use crate::error::{Error, Result};

/// Selector values that mean "no restriction"
const ALL_SENTINELS: &[&str] = &["", "all", "todas", "todos"];

pub trait Filter<T> {
    fn matches(&self, record: &T) -> bool;

    /// Keep matching records, preserving input order
    fn apply<'a, I>(&self, records: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Case-insensitive substring test; an empty needle always matches
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn selector_matches<T: PartialEq>(selector: Option<T>, value: T) -> bool {
    selector.map_or(true, |s| s == value)
}

/// Parse a selector, mapping the "all" sentinels to `None`
pub fn parse_selector<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    match raw.map(str::trim) {
        None => Ok(None),
        Some(s) if ALL_SENTINELS.contains(&s.to_lowercase().as_str()) => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Step a selector through "all" followed by every option, wrapping around
pub fn cycle_selector<T: Copy + PartialEq>(current: Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(value) => {
            let pos = options.iter().position(|o| *o == value);
            pos.and_then(|i| options.get(i + 1)).copied()
        }
    }
}

// ============================================================================
// EXPENSES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub query: String,
    pub category: Option<ExpenseCategory>,
    pub status: Option<ExpenseStatus>,
    pub kind: Option<ExpenseType>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(mut self, kind: ExpenseType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// True when every criterion is "all"
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.category.is_none()
            && self.status.is_none()
            && self.kind.is_none()
    }
}

impl Filter<Expense> for ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        let text = contains_ci(&expense.name, &self.query)
            || contains_ci(expense.responsible.name(), &self.query);

        text && selector_matches(self.category, expense.category)
            && selector_matches(self.status, expense.status)
            && selector_matches(self.kind, expense.kind)
    }
}

/// Raw expense selection as it arrives from a query string or the CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TryFrom<&ExpenseParams> for ExpenseFilter {
    type Error = Error;

    fn try_from(params: &ExpenseParams) -> Result<Self> {
        Ok(ExpenseFilter {
            query: params.q.clone().unwrap_or_default(),
            category: parse_selector(params.category.as_deref())?,
            status: parse_selector(params.status.as_deref())?,
            kind: parse_selector(params.kind.as_deref())?,
        })
    }
}

// ============================================================================
// TASKS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub query: String,
    pub category: Option<TaskCategory>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.category.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

impl Filter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        let text =
            contains_ci(&task.title, &self.query) || contains_ci(task.assignee.name(), &self.query);

        text && selector_matches(self.category, task.category)
            && selector_matches(self.status, task.status)
            && selector_matches(self.priority, task.priority)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TryFrom<&TaskParams> for TaskFilter {
    type Error = Error;

    fn try_from(params: &TaskParams) -> Result<Self> {
        Ok(TaskFilter {
            query: params.q.clone().unwrap_or_default(),
            category: parse_selector(params.category.as_deref())?,
            status: parse_selector(params.status.as_deref())?,
            priority: parse_selector(params.priority.as_deref())?,
        })
    }
}
