// 📊 Aggregator - summary tiles derived from a (filtered) sequence
//
// Every aggregate is a fold with a commutative combine step, so the result
// does not depend on the order of the input sequence. Money sums saturate at
// `Decimal::MAX` instead of panicking.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::entities::{Expense, ExpenseCategory, ExpenseStatus, Task, TaskPriority, TaskStatus};

// ============================================================================
// EXPENSE SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    pub count: usize,
    pub total: Decimal,
    pub paid: Decimal,
    pub paid_count: usize,
    pub pending: Decimal,
    pub pending_count: usize,
}

impl ExpenseSummary {
    pub fn from_records<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        expenses.into_iter().fold(Self::default(), |mut acc, expense| {
            acc.count += 1;
            acc.total = acc.total.saturating_add(expense.amount);
            match expense.status {
                ExpenseStatus::Paid => {
                    acc.paid = acc.paid.saturating_add(expense.amount);
                    acc.paid_count += 1;
                }
                ExpenseStatus::Pending => {
                    acc.pending = acc.pending.saturating_add(expense.amount);
                    acc.pending_count += 1;
                }
            }
            acc
        })
    }
}

// ============================================================================
// TASK SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskSummary {
    pub fn from_records<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            match task.status {
                TaskStatus::Pending => acc.pending += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Completed => acc.completed += 1,
            }
            acc
        })
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub monthly_budget: Decimal,
    pub total_spent: Decimal,
    /// Budget minus spend; negative when over budget
    pub remaining: Decimal,
    pub over_budget: bool,
    pub percentage_used: u32,
}

impl BudgetSummary {
    pub fn new<'a, I>(monthly_budget: Decimal, expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let total_spent = total(expenses.into_iter().map(|e| e.amount));
        let remaining = monthly_budget.saturating_sub(total_spent);

        Self {
            monthly_budget,
            total_spent,
            remaining,
            over_budget: remaining < Decimal::ZERO,
            percentage_used: percentage(total_spent, monthly_budget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub percentage: u32,
}

/// Spend per category, largest first; categories without spend are omitted
pub fn spending_by_category<'a, I>(expenses: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut totals: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
    for expense in expenses {
        let sum = totals.entry(expense.category).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(expense.amount);
    }
    let grand_total = total(totals.values().copied());

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: percentage(amount, grand_total),
        })
        .collect();

    // Stable sort keeps category declaration order for equal amounts
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingTasks<'a> {
    pub tasks: Vec<&'a Task>,
    pub high_priority: usize,
}

/// Open tasks ordered by due date (ties by id)
pub fn upcoming_tasks<'a, I>(tasks: I) -> UpcomingTasks<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut open: Vec<&Task> = tasks.into_iter().filter(|t| !t.is_completed()).collect();
    open.sort_by_key(|t| (t.due_date, t.id));
    let high_priority = open.iter().filter(|t| t.priority == TaskPriority::High).count();

    UpcomingTasks {
        tasks: open,
        high_priority,
    }
}

fn total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part / whole` as a whole percentage, rounded half away from zero.
///
/// Negative ratios clamp to 0 and ratios beyond `u32` to `u32::MAX`.
fn percentage(part: Decimal, whole: Decimal) -> u32 {
    if whole.is_zero() || part.is_zero() {
        return 0;
    }
    if part.is_sign_negative() != whole.is_sign_negative() {
        return 0;
    }
    // Scale first for precision; divide first when the scaled part overflows
    let ratio = part
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole).and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        });

    match ratio {
        Some(ratio) => ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(u32::MAX),
        None => u32::MAX,
    }
}
