// ✅ Task Entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Person;

closed_enum! {
    TaskCategory, "task category" {
        Limpeza => "Limpeza", "Limpeza";
        Financeiro => "Financeiro", "Financeiro";
        Compras => "Compras", "Compras";
        Planejamento => "Planejamento", "Planejamento";
        Manutencao => "Manutenção", "Manutenção";
        Outros => "Outros", "Outros";
    }
}

closed_enum! {
    TaskStatus, "task status" {
        Pending => "pending", "Pendente";
        InProgress => "in_progress", "Em Andamento";
        Completed => "completed", "Concluída";
    }
}

closed_enum! {
    /// Task priority; option lists show it highest first
    TaskPriority, "task priority" {
        High => "high", "Alta";
        Medium => "medium", "Média";
        Low => "low", "Baixa";
    }
}

closed_enum! {
    /// Repeat frequency offered by the task form
    Frequency, "frequency" {
        Daily => "daily", "Diariamente";
        Weekly => "weekly", "Semanalmente";
        Monthly => "monthly", "Mensalmente";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub assignee: Person,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub recurring: bool,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_camel_case_fields() {
        let json = r#"{
            "id": 4,
            "title": "Aspirar a casa",
            "description": "Aspirar todos os cômodos da casa",
            "dueDate": "2024-08-02",
            "assignee": "Maria Silva",
            "status": "in_progress",
            "priority": "medium",
            "category": "Limpeza",
            "recurring": true
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.recurring);
        assert!(!task.is_completed());
    }

    #[test]
    fn test_task_status_labels() {
        assert_eq!(TaskStatus::InProgress.label(), "Em Andamento");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!("em andamento".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn test_priority_options_are_highest_first() {
        assert_eq!(
            TaskPriority::ALL,
            &[TaskPriority::High, TaskPriority::Medium, TaskPriority::Low]
        );
    }
}
