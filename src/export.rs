// 📤 CSV export of an expense selection

use serde::Serialize;
use std::io::Write;

use crate::entities::Expense;
use crate::error::Result;

#[derive(Serialize)]
struct ExpenseRow<'a> {
    id: u32,
    name: &'a str,
    amount: String,
    category: &'a str,
    date: String,
    responsible: &'a str,
    status: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id,
            name: &expense.name,
            amount: expense.amount.to_string(),
            category: expense.category.as_str(),
            date: expense.date.format("%Y-%m-%d").to_string(),
            responsible: expense.responsible.name(),
            status: expense.status.as_str(),
            kind: expense.kind.as_str(),
        }
    }
}

/// Write `expenses` as CSV with a header row
pub fn write_expenses_csv<'a, W, I>(writer: W, expenses: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Expense>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0usize;
    for expense in expenses {
        csv_writer.serialize(ExpenseRow::from(expense))?;
        rows += 1;
    }
    if rows == 0 {
        // serialize() only emits the header together with the first record
        csv_writer.write_record([
            "id", "name", "amount", "category", "date", "responsible", "status", "type",
        ])?;
    }
    csv_writer.flush()?;
    tracing::debug!(rows, "exported expenses");
    Ok(())
}

pub fn expenses_to_csv<'a, I>(expenses: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut buffer = Vec::new();
    write_expenses_csv(&mut buffer, expenses)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
