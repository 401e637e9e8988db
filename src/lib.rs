// Household Manager - Core Library
// Exposes all modules for use in the TUI, the web server, and tests

pub mod entities;
pub mod error;
pub mod export;
pub mod filter;
pub mod forms;
pub mod labels;
pub mod routes;
pub mod settings;
pub mod store;
pub mod summary;

#[cfg(feature = "server")]
pub mod pages;
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use entities::{
    Expense, ExpenseCategory, ExpenseStatus, ExpenseType, Frequency, Person, Task, TaskCategory,
    TaskPriority, TaskStatus,
};
pub use error::{Error, Result};
pub use filter::{ExpenseFilter, Filter, TaskFilter};
pub use forms::{ExpenseDraft, TaskDraft, Toast, ToastKind};
pub use routes::Route;
pub use settings::Settings;
pub use store::{ExpenseStore, Household, TaskStore};
pub use summary::{BudgetSummary, ExpenseSummary, TaskSummary};

#[cfg(feature = "server")]
pub use server::{router, ApiResponse, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
