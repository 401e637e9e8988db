// 💸 Expense Entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Person;

// ============================================================================
// CLOSED SETS
// ============================================================================

closed_enum! {
    /// Spending category
    ExpenseCategory, "expense category" {
        Alimentacao => "Alimentação", "Alimentação";
        Transporte => "Transporte", "Transporte";
        Casa => "Casa", "Casa";
        Lazer => "Lazer", "Lazer";
        Saude => "Saúde", "Saúde";
        Educacao => "Educação", "Educação";
        Outros => "Outros", "Outros";
    }
}

closed_enum! {
    ExpenseStatus, "expense status" {
        Paid => "paid", "Pago";
        Pending => "pending", "Pendente";
    }
}

closed_enum! {
    /// How an expense repeats
    ExpenseType, "expense type" {
        Fixed => "fixed", "Fixo";
        Recurring => "recurring", "Recorrente";
        Variable => "variable", "Variável";
    }
}

impl ExpenseType {
    /// Hint shown under the type picker of the expense form
    pub fn hint(&self) -> &'static str {
        match self {
            ExpenseType::Fixed => "Valor sempre igual",
            ExpenseType::Recurring => "Repete mensalmente",
            ExpenseType::Variable => "Valor eventual",
        }
    }
}

// ============================================================================
// EXPENSE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique within the expense store
    pub id: u32,

    pub name: String,

    /// Currency amount in BRL, never negative
    pub amount: Decimal,

    pub category: ExpenseCategory,

    pub date: NaiveDate,

    /// Who paid
    pub responsible: Person,

    pub status: ExpenseStatus,

    #[serde(rename = "type")]
    pub kind: ExpenseType,
}

impl Expense {
    pub fn is_paid(&self) -> bool {
        self.status == ExpenseStatus::Paid
    }
}
