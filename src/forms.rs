// 📝 Form drafts and simulated submission
//
// The "new expense" and "new task" dialogs collect a draft, validate the
// required fields, wait a fixed delay standing in for an API call and then
// report success through a toast. Submitted drafts are discarded: nothing
// ever reaches the record stores.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::entities::{
    ExpenseCategory, ExpenseType, Frequency, Person, TaskCategory, TaskPriority,
};
use crate::labels::format_brl;

/// Delay of the simulated API call
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} é obrigatório")]
    Missing(&'static str),
    #[error("valor inválido: {0:?}")]
    InvalidAmount(String),
    #[error("opção inválida para {field}: {value:?}")]
    InvalidChoice { field: &'static str, value: String },
}

// ============================================================================
// TOASTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == ToastKind::Success
    }
}

// ============================================================================
// DRAFTS
// ============================================================================

/// A form that can be submitted
pub trait Draft {
    /// Title of the toast shown when validation fails
    const ERROR_TITLE: &'static str;

    fn validate(&self) -> Result<(), FormError>;

    /// Toast shown after the simulated call; only called on valid drafts
    fn success_toast(&self) -> Toast;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub name: String,
    /// Raw text of the amount field
    pub amount: String,
    pub category: Option<ExpenseCategory>,
    pub date: Option<NaiveDate>,
    pub responsible: Option<Person>,
    #[serde(rename = "type")]
    pub kind: Option<ExpenseType>,
    pub description: String,
    pub recurring: bool,
}

impl ExpenseDraft {
    /// Empty draft dated today, like a freshly opened dialog
    pub fn today() -> Self {
        Self {
            date: Some(chrono::Local::now().date_naive()),
            ..Self::default()
        }
    }

    pub fn parsed_amount(&self) -> Result<Decimal, FormError> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(FormError::Missing("Valor"));
        }
        let amount = Decimal::from_str(&raw.replace(',', "."))
            .map_err(|_| FormError::InvalidAmount(raw.to_string()))?;
        if amount < Decimal::ZERO {
            return Err(FormError::InvalidAmount(raw.to_string()));
        }
        Ok(amount)
    }
}

impl Draft for ExpenseDraft {
    const ERROR_TITLE: &'static str = "Erro ao registrar despesa";

    fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Missing("Nome da Despesa"));
        }
        self.parsed_amount()?;
        if self.date.is_none() {
            return Err(FormError::Missing("Data"));
        }
        Ok(())
    }

    fn success_toast(&self) -> Toast {
        let amount = self
            .parsed_amount()
            .map(format_brl)
            .unwrap_or_else(|_| self.amount.clone());
        Toast::success(
            "Despesa registrada com sucesso!",
            format!("{} no valor de {} foi registrada.", self.name.trim(), amount),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<Person>,
    pub priority: TaskPriority,
    pub category: Option<TaskCategory>,
    pub recurring: bool,
    pub recurring_frequency: Frequency,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: None,
            assignee: None,
            priority: TaskPriority::Medium,
            category: None,
            recurring: false,
            recurring_frequency: Frequency::Weekly,
        }
    }
}

impl Draft for TaskDraft {
    const ERROR_TITLE: &'static str = "Erro ao criar tarefa";

    fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Missing("Título da Tarefa"));
        }
        if self.due_date.is_none() {
            return Err(FormError::Missing("Data de Vencimento"));
        }
        Ok(())
    }

    fn success_toast(&self) -> Toast {
        let description = match self.assignee {
            Some(person) => format!("{} foi atribuída a {}.", self.title.trim(), person.name()),
            None => format!("{} foi criada.", self.title.trim()),
        };
        Toast::success("Tarefa criada com sucesso!", description)
    }
}

// ============================================================================
// HTML FORM FIELDS
// ============================================================================

/// Parse an optional select; the empty placeholder option means "not chosen"
fn choice<T: FromStr>(field: &'static str, raw: &str) -> Result<Option<T>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| FormError::InvalidChoice {
        field,
        value: raw.to_string(),
    })
}

/// A browser posts "on" for a ticked checkbox and omits it otherwise;
/// JSON clients send a bool
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => flag,
        Raw::Text(_) => true,
    })
}

/// Expense dialog as posted by a browser form or a JSON client. Selects are
/// text, so labels ("Fixo") and wire values ("fixed") are both accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseFields {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub responsible: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(deserialize_with = "checkbox")]
    pub recurring: bool,
}

impl TryFrom<ExpenseFields> for ExpenseDraft {
    type Error = FormError;

    fn try_from(fields: ExpenseFields) -> Result<Self, FormError> {
        Ok(ExpenseDraft {
            category: choice("Categoria", &fields.category)?,
            date: choice("Data", &fields.date)?,
            responsible: choice("Responsável", &fields.responsible)?,
            kind: choice("Tipo de Despesa", &fields.kind)?,
            recurring: fields.recurring,
            name: fields.name,
            amount: fields.amount,
            description: fields.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub assignee: String,
    pub priority: String,
    pub category: String,
    #[serde(deserialize_with = "checkbox")]
    pub recurring: bool,
    pub recurring_frequency: String,
}

impl TryFrom<TaskFields> for TaskDraft {
    type Error = FormError;

    fn try_from(fields: TaskFields) -> Result<Self, FormError> {
        let defaults = TaskDraft::default();
        Ok(TaskDraft {
            due_date: choice("Data de Vencimento", &fields.due_date)?,
            assignee: choice("Responsável", &fields.assignee)?,
            priority: choice("Prioridade", &fields.priority)?.unwrap_or(defaults.priority),
            category: choice("Categoria", &fields.category)?,
            recurring: fields.recurring,
            recurring_frequency: choice("Frequência", &fields.recurring_frequency)?
                .unwrap_or(defaults.recurring_frequency),
            title: fields.title,
            description: fields.description,
        })
    }
}

/// Convert posted fields, turning conversion failures into an error toast
pub fn draft_from_fields<D, F>(fields: F) -> Result<D, Toast>
where
    D: Draft + TryFrom<F, Error = FormError>,
{
    D::try_from(fields).map_err(rejected::<D>)
}

// ============================================================================
// SUBMISSION
// ============================================================================

fn rejected<D: Draft>(err: FormError) -> Toast {
    tracing::debug!(error = %err, "form rejected");
    Toast::error(D::ERROR_TITLE, err.to_string())
}

/// Validate, then wait `delay` on the current thread and report success
pub fn submit_blocking<D: Draft>(draft: &D, delay: Duration) -> Toast {
    if let Err(err) = draft.validate() {
        return rejected::<D>(err);
    }
    std::thread::sleep(delay);
    let toast = draft.success_toast();
    tracing::info!(title = %toast.title, "simulated submit finished");
    toast
}

/// Async flavour of [`submit_blocking`] for the web server
#[cfg(feature = "server")]
pub async fn submit<D: Draft>(draft: &D, delay: Duration) -> Toast {
    if let Err(err) = draft.validate() {
        return rejected::<D>(err);
    }
    tokio::time::sleep(delay).await;
    let toast = draft.success_toast();
    tracing::info!(title = %toast.title, "simulated submit finished");
    toast
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense() -> ExpenseDraft {
        ExpenseDraft {
            name: "Farmácia".to_string(),
            amount: "32,40".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 7),
            ..ExpenseDraft::default()
        }
    }

    #[test]
    fn test_valid_expense_draft() {
        let draft = expense();
        assert_eq!(draft.validate(), Ok(()));
        assert_eq!(draft.parsed_amount().unwrap(), Decimal::new(3240, 2));
    }

    #[test]
    fn test_expense_required_fields() {
        let mut draft = expense();
        draft.name = "   ".to_string();
        assert_eq!(draft.validate(), Err(FormError::Missing("Nome da Despesa")));

        let mut draft = expense();
        draft.amount.clear();
        assert_eq!(draft.validate(), Err(FormError::Missing("Valor")));

        let mut draft = expense();
        draft.date = None;
        assert_eq!(draft.validate(), Err(FormError::Missing("Data")));
    }

    #[test]
    fn test_expense_amount_must_be_non_negative_number() {
        let mut draft = expense();
        draft.amount = "abc".to_string();
        assert!(matches!(draft.validate(), Err(FormError::InvalidAmount(_))));

        draft.amount = "-5".to_string();
        assert!(matches!(draft.validate(), Err(FormError::InvalidAmount(_))));
    }

    #[test]
    fn test_submit_succeeds_after_delay() {
        let toast = submit_blocking(&expense(), Duration::ZERO);

        assert!(toast.is_success());
        assert_eq!(toast.title, "Despesa registrada com sucesso!");
        assert_eq!(toast.description, "Farmácia no valor de R$ 32,40 foi registrada.");
    }

    #[test]
    fn test_submit_invalid_draft_gives_error_toast() {
        let toast = submit_blocking(&TaskDraft::default(), Duration::ZERO);

        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title, "Erro ao criar tarefa");
        assert_eq!(toast.description, "Título da Tarefa é obrigatório");
    }

    #[test]
    fn test_task_draft_defaults_and_toast() {
        let draft: TaskDraft = serde_json::from_str(
            r#"{"title": "Trocar lâmpada", "dueDate": "2024-08-10", "assignee": "Ana Silva"}"#,
        )
        .unwrap();

        assert_eq!(draft.priority, TaskPriority::Medium);
        assert_eq!(draft.recurring_frequency, Frequency::Weekly);
        assert!(!draft.recurring);

        let toast = submit_blocking(&draft, Duration::ZERO);
        assert!(toast.is_success());
        assert_eq!(toast.description, "Trocar lâmpada foi atribuída a Ana Silva.");
    }

    #[test]
    fn test_expense_draft_today_has_date() {
        assert!(ExpenseDraft::today().date.is_some());
    }

    #[test]
    fn test_expense_fields_convert_with_placeholders() {
        let fields = ExpenseFields {
            name: "Padaria".to_string(),
            amount: "12.50".to_string(),
            date: "2024-08-09".to_string(),
            responsible: "Maria Silva".to_string(),
            kind: "variable".to_string(),
            ..ExpenseFields::default()
        };

        let draft: ExpenseDraft = draft_from_fields(fields).unwrap();
        assert_eq!(draft.category, None);
        assert_eq!(draft.responsible, Some(Person::MariaSilva));
        assert_eq!(draft.kind, Some(ExpenseType::Variable));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 8, 9));
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_task_fields_reject_unknown_choice() {
        let fields = TaskFields {
            title: "Regar plantas".to_string(),
            priority: "urgent".to_string(),
            ..TaskFields::default()
        };

        let toast = draft_from_fields::<TaskDraft, _>(fields).unwrap_err();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.description.contains("Prioridade"));
    }

    #[test]
    fn test_task_fields_default_priority_and_frequency() {
        let draft: TaskDraft = draft_from_fields(TaskFields {
            title: "Regar plantas".to_string(),
            due_date: "2024-08-12".to_string(),
            recurring: true,
            ..TaskFields::default()
        })
        .unwrap();

        assert_eq!(draft.priority, TaskPriority::Medium);
        assert_eq!(draft.recurring_frequency, Frequency::Weekly);
        assert!(draft.recurring);
    }

    #[test]
    fn test_fields_accept_json_bodies_and_labels() {
        let fields: ExpenseFields = serde_json::from_str(
            r#"{"name": "Academia", "amount": "99,90", "date": "2024-08-10",
                "category": "Saúde", "type": "Fixo", "recurring": true}"#,
        )
        .unwrap();
        let draft: ExpenseDraft = draft_from_fields(fields).unwrap();
        assert_eq!(draft.kind, Some(ExpenseType::Fixed));
        assert_eq!(draft.category, Some(ExpenseCategory::Saude));
        assert!(draft.recurring);

        let fields: TaskFields =
            serde_json::from_str(r#"{"title": "Lavar carro", "recurring": false}"#).unwrap();
        assert!(!fields.recurring);
    }

    #[test]
    fn test_checkbox_text_means_ticked() {
        let fields: TaskFields =
            serde_json::from_str(r#"{"title": "Lavar carro", "recurring": "on"}"#).unwrap();
        assert!(fields.recurring);
        assert!(!TaskFields::default().recurring);
    }

    #[test]
    fn test_unknown_category_becomes_error_toast() {
        let fields: ExpenseFields =
            serde_json::from_str(r#"{"name": "Hotel", "amount": "1", "category": "Viagem"}"#)
                .unwrap();

        let toast = draft_from_fields::<ExpenseDraft, _>(fields).unwrap_err();
        assert_eq!(toast.title, ExpenseDraft::ERROR_TITLE);
        assert!(toast.description.contains("Categoria"));
        assert!(toast.description.contains("Viagem"));
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn test_async_submit_matches_blocking() {
        let draft = expense();
        assert_eq!(
            submit(&draft, Duration::ZERO).await,
            submit_blocking(&draft, Duration::ZERO)
        );
    }
}
