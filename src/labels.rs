// 🏷️ Presentation lookup tables and pt-BR formatting
//
// Static mappings from status/type/priority to a badge tone, plus the money
// and date formats the views render. No filtering logic lives here.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::entities::{ExpenseStatus, ExpenseType, TaskPriority, TaskStatus};

/// Visual treatment of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Secondary,
    Outline,
}

impl Tone {
    /// CSS class used by the web views
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Success => "badge badge-success",
            Tone::Warning => "badge badge-warning",
            Tone::Danger => "badge badge-danger",
            Tone::Secondary => "badge badge-secondary",
            Tone::Outline => "badge badge-outline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

/// Anything rendered as a badge
pub trait Badged {
    fn badge(&self) -> Badge;
}

impl Badged for ExpenseStatus {
    fn badge(&self) -> Badge {
        let tone = match self {
            ExpenseStatus::Paid => Tone::Success,
            ExpenseStatus::Pending => Tone::Warning,
        };
        Badge { label: self.label(), tone }
    }
}

impl Badged for ExpenseType {
    fn badge(&self) -> Badge {
        Badge {
            label: self.label(),
            tone: Tone::Outline,
        }
    }
}

impl Badged for TaskStatus {
    fn badge(&self) -> Badge {
        let tone = match self {
            TaskStatus::Completed => Tone::Success,
            TaskStatus::InProgress => Tone::Secondary,
            TaskStatus::Pending => Tone::Warning,
        };
        Badge { label: self.label(), tone }
    }
}

impl Badged for TaskPriority {
    fn badge(&self) -> Badge {
        let tone = match self {
            TaskPriority::High => Tone::Danger,
            TaskPriority::Medium => Tone::Warning,
            TaskPriority::Low => Tone::Success,
        };
        Badge { label: self.label(), tone }
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// "R$ 1.234,56" - two fraction digits, dot thousands separator
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac_part}")
}

/// "dd/mm/yyyy"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// First letter of every word: "Maria Silva" → "MS"
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(24580, 2)), "R$ 245,80");
        assert_eq!(format_brl(Decimal::new(120, 0)), "R$ 120,00");
        assert_eq!(format_brl(Decimal::new(70120, 2)), "R$ 701,20");
        assert_eq!(format_brl(Decimal::new(350000, 2)), "R$ 3.500,00");
        assert_eq!(format_brl(Decimal::new(123456789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_rounds_only_at_render() {
        assert_eq!(format_brl(Decimal::new(10005, 3)), "R$ 10,01");
        assert_eq!(format_brl(Decimal::new(-20120, 2)), "R$ -201,20");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
        assert_eq!(format_date(date), "03/08/2024");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("João Silva"), "JS");
        assert_eq!(initials("  Ana   Maria Silva "), "AMS");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_badge_tables() {
        assert_eq!(
            ExpenseStatus::Paid.badge(),
            Badge { label: "Pago", tone: Tone::Success }
        );
        assert_eq!(ExpenseStatus::Pending.badge().tone, Tone::Warning);
        assert_eq!(ExpenseType::Recurring.badge().label, "Recorrente");
        assert_eq!(TaskStatus::InProgress.badge().tone, Tone::Secondary);
        assert_eq!(TaskStatus::Completed.badge().label, "Concluída");
        assert_eq!(TaskPriority::High.badge(), Badge { label: "Alta", tone: Tone::Danger });
        assert_eq!(TaskPriority::Low.badge().tone, Tone::Success);
    }
}
