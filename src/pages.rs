// 🌐 Server-rendered HTML views
//
// Every view is a pure function from already-filtered data to an HTML
// string. Pages inside the app layout share one header and one sidebar.

use std::fmt::Write as _;

use crate::entities::{
    Expense, ExpenseCategory, ExpenseStatus, ExpenseType, Frequency, Person, Task, TaskCategory,
    TaskPriority, TaskStatus,
};
use crate::filter::{ExpenseFilter, TaskFilter};
use crate::forms::{Toast, ToastKind};
use crate::labels::{format_brl, format_date, initials, Badge, Badged};
use crate::routes::{is_active, Route, NAVIGATION, QUICK_ACTIONS};
use crate::summary::{BudgetSummary, CategoryShare, ExpenseSummary, TaskSummary, UpcomingTasks};

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
nav{width:240px;padding:1rem;border-right:1px solid #ddd;min-height:100vh}\
nav a{display:block;padding:.4rem;color:#333;text-decoration:none}\
nav a.active{background:#eef;font-weight:bold}\
main{flex:1;padding:1.5rem}header{display:flex;justify-content:space-between}\
.tiles{display:flex;gap:1rem}.tile{border:1px solid #ddd;border-radius:8px;padding:1rem;flex:1}\
table{width:100%;border-collapse:collapse}\
td,th{padding:.4rem;border-bottom:1px solid #eee;text-align:left}\
.badge{padding:.1rem .5rem;border-radius:9px;font-size:.8rem}\
.badge-success{background:#16a34a;color:#fff}.badge-warning{background:#f59e0b;color:#fff}\
.badge-danger{background:#dc2626;color:#fff}.badge-secondary{background:#6366f1;color:#fff}\
.badge-outline{border:1px solid #999}.toast{padding:.8rem;border-radius:6px;margin-bottom:1rem}\
.toast-success{background:#dcfce7}.toast-error{background:#fee2e2}";

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\">\
         <title>{} · Gestão Doméstica</title><style>{STYLE}</style></head>\
         <body>{body}</body></html>",
        escape(title)
    )
}

fn badge(badge: Badge) -> String {
    format!("<span class=\"{}\">{}</span>", badge.tone.css_class(), escape(badge.label))
}

fn avatar(person: Person) -> String {
    format!(
        "<span class=\"avatar\" title=\"{name}\">{}</span> {name}",
        initials(person.name()),
        name = escape(person.name())
    )
}

fn toast_html(toast: Option<&Toast>) -> String {
    match toast {
        Some(toast) => {
            let class = match toast.kind {
                ToastKind::Success => "toast toast-success",
                ToastKind::Error => "toast toast-error",
            };
            format!(
                "<div class=\"{class}\" role=\"status\"><strong>{}</strong><p>{}</p></div>",
                escape(&toast.title),
                escape(&toast.description)
            )
        }
        None => String::new(),
    }
}

fn sidebar(current_path: &str) -> String {
    let mut html = String::from("<nav><h2>Gestão Doméstica</h2>");
    for item in NAVIGATION {
        let class = if is_active(item.href, current_path) { " class=\"active\"" } else { "" };
        let _ = write!(html, "<a href=\"{}\"{class}>{}", item.href, escape(item.title));
        if let Some(description) = item.description {
            let _ = write!(html, "<small> {}</small>", escape(description));
        }
        html.push_str("</a>");
    }
    html.push_str("<h3>Acesso Rápido</h3>");
    for item in QUICK_ACTIONS {
        let class = if is_active(item.href, current_path) { " class=\"active\"" } else { "" };
        let _ = write!(html, "<a href=\"{}\"{class}>{}</a>", item.href, escape(item.title));
    }
    html.push_str("</nav>");
    html
}

/// App chrome: sidebar, page header and content
pub fn layout(
    current_path: &str,
    route: Route,
    subtitle: &str,
    actions: &str,
    content: &str,
) -> String {
    let body = format!(
        "{}<main><header><div><h1>{}</h1><p>{}</p></div>\
         <div>{actions}</div></header>{content}</main>",
        sidebar(current_path),
        escape(route.title()),
        escape(subtitle)
    );
    document(route.title(), &body)
}

fn tile(title: &str, value: &str, note: &str) -> String {
    format!(
        "<div class=\"tile\"><h4>{}</h4><div class=\"value\">{}</div><small>{}</small></div>",
        escape(title),
        escape(value),
        escape(note)
    )
}

/// `<select>` whose first option is the "all" sentinel
fn select<T: Copy + PartialEq>(
    name: &str,
    all_label: &str,
    options: &[T],
    selected: Option<T>,
    value: impl Fn(&T) -> &'static str,
    label: impl Fn(&T) -> &'static str,
) -> String {
    let mut html = format!(
        "<select name=\"{name}\"><option value=\"all\">{}</option>",
        escape(all_label)
    );
    for option in options {
        let marker = if selected == Some(*option) { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{marker}>{}</option>",
            escape(value(option)),
            escape(label(option))
        );
    }
    html.push_str("</select>");
    html
}

/// Plain `<select>` for dialog forms, starting with an empty placeholder
fn form_select<T>(
    name: &str,
    placeholder: &str,
    options: &[T],
    label: impl Fn(&T) -> &'static str,
) -> String {
    let mut html = format!(
        "<select name=\"{name}\"><option value=\"\">{}</option>",
        escape(placeholder)
    );
    for option in options {
        let text = escape(label(option));
        let _ = write!(html, "<option value=\"{text}\">{text}</option>");
    }
    html.push_str("</select>");
    html
}

fn query_pair(out: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push(format!("{key}={}", urlencoding::encode(value)));
    }
}

/// Query string reproducing an expense selection (used by the export link)
pub fn expense_query_string(filter: &ExpenseFilter) -> String {
    let mut pairs = Vec::new();
    query_pair(&mut pairs, "q", Some(filter.query.as_str()));
    query_pair(&mut pairs, "category", filter.category.map(|c| c.as_str()));
    query_pair(&mut pairs, "status", filter.status.map(|s| s.as_str()));
    query_pair(&mut pairs, "type", filter.kind.map(|k| k.as_str()));
    pairs.join("&")
}

// ============================================================================
// PUBLIC VIEWS
// ============================================================================

pub fn landing(current_path: &str) -> String {
    let features = [
        (
            "Controle Financeiro",
            "Monitore gastos, defina orçamentos e acompanhe suas metas financeiras domésticas.",
        ),
        (
            "Gestão de Tarefas",
            "Organize atividades domésticas, defina responsáveis e prazos para cada tarefa.",
        ),
        ("Compartilhamento Familiar", "Colabore com todos os membros da família em tempo real."),
        ("Acesso Móvel", "Use em qualquer dispositivo - computador, tablet ou smartphone."),
    ];
    let mut content = String::from(
        "<section><h2>Gestão Doméstica Simplificada</h2>\
         <p>A plataforma completa para organizar despesas, tarefas e a vida doméstica.</p>\
         <p><a href=\"/dashboard\">Começar Agora</a> · \
         <a href=\"/login\">Fazer Login</a></p></section>\
         <section class=\"tiles\">",
    );
    for (title, description) in features {
        let _ = write!(
            content,
            "<div class=\"tile\"><h3>{}</h3><p>{}</p></div>",
            escape(title),
            escape(description)
        );
    }
    content.push_str("</section>");
    layout(current_path, Route::Landing, "Organize sua casa com inteligência", "", &content)
}

/// Login form; it posts nowhere
pub fn login() -> String {
    document(
        Route::Login.title(),
        "<main><h1>Bem-vindo de volta</h1><p>Faça login para acessar sua conta</p>\
         <form onsubmit=\"return false\">\
         <label>Email <input type=\"email\" name=\"email\" placeholder=\"seu@email.com\"></label>\
         <label>Senha <input type=\"password\" name=\"password\"></label>\
         <label><input type=\"checkbox\" name=\"rememberMe\"> Lembrar de mim</label>\
         <button type=\"submit\">Entrar</button></form>\
         <p>Não tem uma conta? <a href=\"/register\">Cadastre-se</a></p></main>",
    )
}

/// Registration form; it posts nowhere
pub fn register() -> String {
    document(
        Route::Register.title(),
        "<main><p><a href=\"/login\">Voltar ao login</a></p><h1>Cadastre-se</h1>\
         <form onsubmit=\"return false\">\
         <label>Nome Completo <input type=\"text\" name=\"name\"></label>\
         <label>Email <input type=\"email\" name=\"email\"></label>\
         <label>Senha <input type=\"password\" name=\"password\"></label>\
         <label>Confirmar Senha <input type=\"password\" name=\"confirmPassword\"></label>\
         <label><input type=\"checkbox\" name=\"acceptTerms\"> Aceito os termos de uso</label>\
         <button type=\"submit\">Criar Conta</button></form>\
         <p>Já tem uma conta? <a href=\"/login\">Faça login</a></p></main>",
    )
}

pub fn not_found() -> String {
    document(
        Route::NotFound.title(),
        "<main><h1>404</h1><h2>Página não encontrada</h2>\
         <p>A página que você está procurando não existe ou foi movida.</p>\
         <p><a href=\"javascript:history.back()\">Voltar</a> · \
         <a href=\"/\">Ir para Início</a></p></main>",
    )
}

// ============================================================================
// DIALOG FORMS
// ============================================================================

fn expense_dialog(action: &str) -> String {
    let mut types = String::new();
    for kind in ExpenseType::ALL {
        let _ = write!(
            types,
            "<label><input type=\"radio\" name=\"type\" value=\"{}\"> {} <small>{}</small></label>",
            kind.as_str(),
            escape(kind.label()),
            escape(kind.hint())
        );
    }
    format!(
        "<details><summary>Nova Despesa</summary><form method=\"post\" action=\"{action}\">\
         <label>Nome da Despesa \
         <input name=\"name\" placeholder=\"Ex: Supermercado Extra\" required></label>\
         <label>Valor (R$) <input name=\"amount\" type=\"number\" step=\"0.01\" required></label>\
         <label>Descrição (Opcional) <textarea name=\"description\"></textarea></label>\
         {}<label>Data <input type=\"date\" name=\"date\" required></label>{}{types}\
         <button type=\"submit\">Salvar Despesa</button></form></details>",
        form_select("category", "Selecionar categoria", ExpenseCategory::ALL, |c| c.label()),
        form_select("responsible", "Quem pagou?", Person::ALL, |p| p.name()),
    )
}

fn task_dialog(action: &str) -> String {
    format!(
        "<details><summary>Nova Tarefa</summary><form method=\"post\" action=\"{action}\">\
         <label>Título da Tarefa \
         <input name=\"title\" placeholder=\"Ex: Limpeza da geladeira\" required></label>\
         <label>Descrição <textarea name=\"description\"></textarea></label>\
         {}<label>Data de Vencimento <input type=\"date\" name=\"dueDate\" required></label>{}{}\
         <label><input type=\"checkbox\" name=\"recurring\"> Repetir esta tarefa</label>{}\
         <button type=\"submit\">Criar Tarefa</button></form></details>",
        form_select("assignee", "Quem vai fazer?", Person::ALL, |p| p.name()),
        form_select("category", "Tipo de tarefa", TaskCategory::ALL, |c| c.label()),
        form_select("priority", "Prioridade", TaskPriority::ALL, |p| p.label()),
        form_select("recurringFrequency", "Frequência", Frequency::ALL, |f| f.label()),
    )
}

// ============================================================================
// EXPENSES
// ============================================================================

pub struct ExpensesView<'a> {
    pub filter: &'a ExpenseFilter,
    pub expenses: &'a [&'a Expense],
    pub summary: &'a ExpenseSummary,
    pub store_len: usize,
    pub toast: Option<&'a Toast>,
}

pub fn expenses(current_path: &str, view: &ExpensesView<'_>) -> String {
    let summary = view.summary;
    let mut content = toast_html(view.toast);

    let _ = write!(
        content,
        "<section class=\"tiles\">{}{}{}</section>",
        tile("Total", &format_brl(summary.total), &format!("{} despesas", summary.count)),
        tile("Pagas", &format_brl(summary.paid), &format!("{} despesas", summary.paid_count)),
        tile(
            "Pendentes",
            &format_brl(summary.pending),
            &format!("{} despesas", summary.pending_count),
        ),
    );

    let filter = view.filter;
    let _ = write!(
        content,
        "<section><h3>Filtros e Busca</h3><form method=\"get\" action=\"/expenses\">\
         <input name=\"q\" placeholder=\"Buscar despesas...\" value=\"{}\">{}{}{}\
         <button type=\"submit\">Filtrar</button></form></section>",
        escape(&filter.query),
        select(
            "category",
            "Todas",
            ExpenseCategory::ALL,
            filter.category,
            |c| c.as_str(),
            |c| c.label(),
        ),
        select("status", "Todos", ExpenseStatus::ALL, filter.status, |s| s.as_str(), |s| s.label()),
        select("type", "Todos", ExpenseType::ALL, filter.kind, |k| k.as_str(), |k| k.label()),
    );

    let _ = write!(
        content,
        "<section><h3>Lista de Despesas</h3><p>{} de {} despesas</p><table><thead><tr>\
         <th>Despesa</th><th>Categoria</th><th>Responsável</th><th>Data</th><th>Tipo</th>\
         <th>Status</th><th>Valor</th></tr></thead><tbody>",
        view.expenses.len(),
        view.store_len
    );
    for expense in view.expenses {
        let _ = write!(
            content,
            "<tr><td>{}</td><td><span class=\"badge badge-secondary\">{}</span></td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&expense.name),
            escape(expense.category.label()),
            avatar(expense.responsible),
            format_date(expense.date),
            badge(expense.kind.badge()),
            badge(expense.status.badge()),
            format_brl(expense.amount)
        );
    }
    content.push_str("</tbody></table></section>");

    let actions = format!(
        "<a href=\"/api/expenses/export.csv?{}\">Exportar</a>{}",
        escape(&expense_query_string(filter)),
        expense_dialog("/expenses")
    );
    layout(current_path, Route::Expenses, "Controle seus gastos domésticos", &actions, &content)
}

// ============================================================================
// TASKS
// ============================================================================

pub struct TasksView<'a> {
    pub filter: &'a TaskFilter,
    pub tasks: &'a [&'a Task],
    pub summary: &'a TaskSummary,
    pub store_len: usize,
    pub toast: Option<&'a Toast>,
}

pub fn tasks(current_path: &str, view: &TasksView<'_>) -> String {
    let summary = view.summary;
    let mut content = toast_html(view.toast);

    let _ = write!(
        content,
        "<section class=\"tiles\">{}{}{}{}</section>",
        tile("Total", &summary.total.to_string(), "tarefas"),
        tile("Concluídas", &summary.completed.to_string(), "finalizadas"),
        tile("Em Andamento", &summary.in_progress.to_string(), "ativas"),
        tile("Pendentes", &summary.pending.to_string(), "aguardando"),
    );

    let filter = view.filter;
    let _ = write!(
        content,
        "<section><h3>Filtros e Busca</h3><form method=\"get\" action=\"/tasks\">\
         <input name=\"q\" placeholder=\"Buscar tarefas...\" value=\"{}\">{}{}{}\
         <button type=\"submit\">Filtrar</button></form></section>",
        escape(&filter.query),
        select(
            "category",
            "Todas",
            TaskCategory::ALL,
            filter.category,
            |c| c.as_str(),
            |c| c.label(),
        ),
        select("status", "Todos", TaskStatus::ALL, filter.status, |s| s.as_str(), |s| s.label()),
        select(
            "priority",
            "Todas",
            TaskPriority::ALL,
            filter.priority,
            |p| p.as_str(),
            |p| p.label(),
        ),
    );

    let _ = write!(
        content,
        "<section><h3>Lista de Tarefas</h3><p>{} de {} tarefas</p><table><thead><tr>\
         <th>Tarefa</th><th>Categoria</th><th>Responsável</th><th>Vencimento</th>\
         <th>Prioridade</th><th>Status</th></tr></thead><tbody>",
        view.tasks.len(),
        view.store_len
    );
    for task in view.tasks {
        let _ = write!(
            content,
            "<tr><td><strong>{}</strong><br><small>{}</small></td>\
             <td><span class=\"badge badge-secondary\">{}</span></td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td></tr>",
            escape(&task.title),
            escape(&task.description),
            escape(task.category.label()),
            avatar(task.assignee),
            format_date(task.due_date),
            badge(task.priority.badge()),
            badge(task.status.badge())
        );
    }
    content.push_str("</tbody></table></section>");

    layout(
        current_path,
        Route::Tasks,
        "Organize as atividades domésticas",
        &task_dialog("/tasks"),
        &content,
    )
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub struct DashboardView<'a> {
    pub budget: &'a BudgetSummary,
    pub categories: &'a [CategoryShare],
    pub upcoming: &'a UpcomingTasks<'a>,
}

pub fn dashboard(current_path: &str, view: &DashboardView<'_>) -> String {
    let budget = view.budget;
    let mut content = format!(
        "<section class=\"tiles\">{}{}{}{}</section>",
        tile("Total Gasto", &format_brl(budget.total_spent), "no mês atual"),
        tile(
            "Orçamento Restante",
            &format_brl(budget.remaining.abs()),
            if budget.over_budget { "Acima do orçamento" } else { "Dentro do orçamento" },
        ),
        tile(
            "% Orçamento Usado",
            &format!("{}%", budget.percentage_used),
            &format!("de {}", format_brl(budget.monthly_budget)),
        ),
        tile(
            "Tarefas Pendentes",
            &view.upcoming.tasks.len().to_string(),
            &format!("{} de alta prioridade", view.upcoming.high_priority),
        ),
    );

    content.push_str("<section><h3>Gastos por Categoria</h3>");
    for share in view.categories {
        let _ = write!(
            content,
            "<div><span>{}</span> <span>{} ({}%)</span>\
             <progress max=\"100\" value=\"{}\"></progress></div>",
            escape(share.category.label()),
            format_brl(share.amount),
            share.percentage,
            share.percentage
        );
    }
    content.push_str("</section><section><h3>Próximas Tarefas</h3><ul>");
    for task in &view.upcoming.tasks {
        let _ = write!(
            content,
            "<li>{} <strong>{}</strong> · {} {}</li>",
            avatar(task.assignee),
            escape(&task.title),
            format_date(task.due_date),
            badge(task.priority.badge())
        );
    }
    content.push_str("</ul><a href=\"/tasks\">Ver Todas as Tarefas</a></section>");

    let actions = format!("{}{}", expense_dialog("/expenses"), task_dialog("/tasks"));
    layout(
        current_path,
        Route::Dashboard,
        "Visão geral da sua gestão doméstica",
        &actions,
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::store::Household;
    use crate::summary::{spending_by_category, upcoming_tasks};
    use rust_decimal::Decimal;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_expenses_page_lists_filtered_rows() {
        let household = Household::embedded().unwrap();
        let filter = ExpenseFilter::new().query("luz");
        let rows = filter.apply(&household.expenses);
        let summary = ExpenseSummary::from_records(rows.iter().copied());

        let html = expenses(
            "/expenses",
            &ExpensesView {
                filter: &filter,
                expenses: &rows,
                summary: &summary,
                store_len: household.expenses.len(),
                toast: None,
            },
        );

        assert!(html.contains("Conta de Luz"));
        assert!(!html.contains("Supermercado Extra"));
        assert!(html.contains("1 de 5 despesas"));
        assert!(html.contains("R$ 180,50"));
        assert!(html.contains("/api/expenses/export.csv?q=luz"));
        assert!(html.contains("<a href=\"/expenses\" class=\"active\">"));
    }

    #[test]
    fn test_tasks_page_marks_selected_options() {
        let household = Household::embedded().unwrap();
        let filter = TaskFilter::new().status(TaskStatus::Completed);
        let rows = filter.apply(&household.tasks);
        let summary = TaskSummary::from_records(rows.iter().copied());
        let toast = Toast::success("Tarefa criada com sucesso!", "ok");

        let html = tasks(
            "/tasks",
            &TasksView {
                filter: &filter,
                tasks: &rows,
                summary: &summary,
                store_len: household.tasks.len(),
                toast: Some(&toast),
            },
        );

        assert!(html.contains("<option value=\"completed\" selected>Concluída</option>"));
        assert!(html.contains("Compras do supermercado"));
        assert!(html.contains("1 de 5 tarefas"));
        assert!(html.contains("toast-success"));
    }

    #[test]
    fn test_dashboard_renders_budget_and_upcoming() {
        let household = Household::embedded().unwrap();
        let budget = BudgetSummary::new(Decimal::new(3500, 0), &household.expenses);
        let categories = spending_by_category(&household.expenses);
        let upcoming = upcoming_tasks(&household.tasks);

        let html = dashboard(
            "/",
            &DashboardView {
                budget: &budget,
                categories: &categories,
                upcoming: &upcoming,
            },
        );

        assert!(html.contains("R$ 2.798,80"));
        assert!(html.contains("Dentro do orçamento"));
        assert!(html.contains("1 de alta prioridade"));
        assert!(html.contains("Aspirar a casa"));
        // Dashboard entry is highlighted on the root path
        assert!(html.contains("<a href=\"/dashboard\" class=\"active\">"));
    }

    #[test]
    fn test_expense_query_string_encodes_values() {
        let filter = ExpenseFilter::new()
            .query("conta de")
            .category(ExpenseCategory::Alimentacao)
            .status(ExpenseStatus::Paid);

        assert_eq!(
            expense_query_string(&filter),
            "q=conta%20de&category=Alimenta%C3%A7%C3%A3o&status=paid"
        );
        assert_eq!(expense_query_string(&ExpenseFilter::new()), "");
    }
}
