use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use household::entities::{
    Expense, ExpenseCategory, ExpenseStatus, ExpenseType, Frequency, Person, Task, TaskCategory,
    TaskPriority, TaskStatus,
};
use household::export::write_expenses_csv;
use household::filter::{cycle_selector, ExpenseFilter, Filter, TaskFilter};
use household::forms::{
    draft_from_fields, submit_blocking, ExpenseDraft, ExpenseFields, TaskDraft, TaskFields, Toast,
    ToastKind,
};
use household::labels::{format_brl, format_date, Badged, Tone};
use household::summary::{
    spending_by_category, upcoming_tasks, BudgetSummary, ExpenseSummary, TaskSummary,
};
use household::{Household, Settings};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

/// File written by the "Exportar" key
const EXPORT_FILE: &str = "despesas.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Expenses,
    Tasks,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Expenses,
            Page::Expenses => Page::Tasks,
            Page::Tasks => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Tasks,
            Page::Expenses => Page::Dashboard,
            Page::Tasks => Page::Expenses,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Expenses => "Despesas",
            Page::Tasks => "Tarefas",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Dialog,
}

// ============================================================================
// NEW EXPENSE / NEW TASK DIALOG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Expense,
    Task,
}

/// One line of a dialog. Fields with options are picked with ←/→
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub options: Vec<&'static str>,
}

impl FormField {
    fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            options: Vec::new(),
        }
    }

    fn choice(key: &'static str, label: &'static str, options: Vec<&'static str>) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            options,
        }
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Step through "" followed by every option
    fn cycle(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() + 1;
        let current = self
            .options
            .iter()
            .position(|o| *o == self.value)
            .map_or(0, |i| i + 1);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.value = if next == 0 { String::new() } else { self.options[next - 1].to_string() };
    }
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub kind: DialogKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Dialog {
    pub fn expense() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            kind: DialogKind::Expense,
            fields: vec![
                FormField::text("name", "Nome da Despesa"),
                FormField::text("amount", "Valor (R$)"),
                FormField::text("description", "Descrição (Opcional)"),
                FormField::choice(
                    "category",
                    "Categoria",
                    ExpenseCategory::ALL.iter().map(|c| c.label()).collect(),
                ),
                FormField::text("date", "Data (AAAA-MM-DD)")
                    .with_value(today.format("%Y-%m-%d").to_string()),
                FormField::choice(
                    "responsible",
                    "Responsável",
                    Person::ALL.iter().map(|p| p.name()).collect(),
                ),
                FormField::choice(
                    "type",
                    "Tipo de Despesa",
                    ExpenseType::ALL.iter().map(|k| k.label()).collect(),
                ),
            ],
            focus: 0,
        }
    }

    pub fn task() -> Self {
        Self {
            kind: DialogKind::Task,
            fields: vec![
                FormField::text("title", "Título da Tarefa"),
                FormField::text("description", "Descrição"),
                FormField::choice(
                    "assignee",
                    "Responsável",
                    Person::ALL.iter().map(|p| p.name()).collect(),
                ),
                FormField::text("dueDate", "Data de Vencimento (AAAA-MM-DD)"),
                FormField::choice(
                    "category",
                    "Categoria",
                    TaskCategory::ALL.iter().map(|c| c.label()).collect(),
                ),
                FormField::choice(
                    "priority",
                    "Prioridade",
                    TaskPriority::ALL.iter().map(|p| p.label()).collect(),
                )
                .with_value(TaskPriority::Medium.label()),
                FormField::choice("recurring", "Repetir esta tarefa", vec!["Sim"]),
                FormField::choice(
                    "recurringFrequency",
                    "Frequência",
                    Frequency::ALL.iter().map(|f| f.label()).collect(),
                )
                .with_value(Frequency::Weekly.label()),
            ],
            focus: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Expense => " Nova Despesa ",
            DialogKind::Task => " Nova Tarefa ",
        }
    }

    fn value(&self, key: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Validate and run the simulated submit; blocks for `delay` on success
    pub fn submit(&self, delay: Duration) -> Toast {
        match self.kind {
            DialogKind::Expense => {
                let fields = ExpenseFields {
                    name: self.value("name"),
                    amount: self.value("amount"),
                    category: self.value("category"),
                    date: self.value("date"),
                    responsible: self.value("responsible"),
                    kind: self.value("type"),
                    description: self.value("description"),
                    recurring: false,
                };
                match draft_from_fields::<ExpenseDraft, _>(fields) {
                    Ok(draft) => submit_blocking(&draft, delay),
                    Err(toast) => toast,
                }
            }
            DialogKind::Task => {
                let fields = TaskFields {
                    title: self.value("title"),
                    description: self.value("description"),
                    due_date: self.value("dueDate"),
                    assignee: self.value("assignee"),
                    priority: self.value("priority"),
                    category: self.value("category"),
                    recurring: !self.value("recurring").is_empty(),
                    recurring_frequency: self.value("recurringFrequency"),
                };
                match draft_from_fields::<TaskDraft, _>(fields) {
                    Ok(draft) => submit_blocking(&draft, delay),
                    Err(toast) => toast,
                }
            }
        }
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub household: Household,
    pub monthly_budget: Decimal,
    pub submit_delay: Duration,
    pub current_page: Page,
    pub mode: InputMode,
    pub expense_filter: ExpenseFilter,
    pub task_filter: TaskFilter,
    /// Store indices of the expenses passing `expense_filter`
    pub expense_rows: Vec<usize>,
    pub task_rows: Vec<usize>,
    pub expense_state: TableState,
    pub task_state: TableState,
    pub dialog: Option<Dialog>,
    pub toast: Option<Toast>,
    pub saving: bool,
}

impl App {
    pub fn new(household: Household, settings: &Settings) -> Self {
        let mut app = Self {
            household,
            monthly_budget: settings.app.monthly_budget,
            submit_delay: settings.submit_delay(),
            current_page: Page::Dashboard,
            mode: InputMode::Normal,
            expense_filter: ExpenseFilter::new(),
            task_filter: TaskFilter::new(),
            expense_rows: Vec::new(),
            task_rows: Vec::new(),
            expense_state: TableState::default(),
            task_state: TableState::default(),
            dialog: None,
            toast: None,
            saving: false,
        };
        app.refresh();
        app
    }

    /// Recompute both filtered sequences and reset the selections
    pub fn refresh(&mut self) {
        self.expense_rows = self
            .household
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| self.expense_filter.matches(e))
            .map(|(i, _)| i)
            .collect();
        self.task_rows = self
            .household
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.task_filter.matches(t))
            .map(|(i, _)| i)
            .collect();

        self.expense_state
            .select(if self.expense_rows.is_empty() { None } else { Some(0) });
        self.task_state
            .select(if self.task_rows.is_empty() { None } else { Some(0) });
    }

    pub fn filtered_expenses(&self) -> Vec<&Expense> {
        let records = self.household.expenses.records();
        self.expense_rows.iter().filter_map(|&i| records.get(i)).collect()
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let records = self.household.tasks.records();
        self.task_rows.iter().filter_map(|&i| records.get(i)).collect()
    }

    pub fn expense_summary(&self) -> ExpenseSummary {
        ExpenseSummary::from_records(self.filtered_expenses())
    }

    pub fn task_summary(&self) -> TaskSummary {
        TaskSummary::from_records(self.filtered_tasks())
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.mode = InputMode::Normal;
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.mode = InputMode::Normal;
    }

    /// Query being edited on the current page
    pub fn query(&self) -> &str {
        match self.current_page {
            Page::Tasks => &self.task_filter.query,
            _ => &self.expense_filter.query,
        }
    }

    pub fn push_query(&mut self, c: char) {
        match self.current_page {
            Page::Expenses => self.expense_filter.query.push(c),
            Page::Tasks => self.task_filter.query.push(c),
            Page::Dashboard => return,
        }
        self.refresh();
    }

    pub fn pop_query(&mut self) {
        match self.current_page {
            Page::Expenses => {
                self.expense_filter.query.pop();
            }
            Page::Tasks => {
                self.task_filter.query.pop();
            }
            Page::Dashboard => return,
        }
        self.refresh();
    }

    pub fn cycle_category(&mut self) {
        match self.current_page {
            Page::Expenses => {
                self.expense_filter.category =
                    cycle_selector(self.expense_filter.category, ExpenseCategory::ALL)
            }
            Page::Tasks => {
                self.task_filter.category =
                    cycle_selector(self.task_filter.category, TaskCategory::ALL)
            }
            Page::Dashboard => return,
        }
        self.refresh();
    }

    pub fn cycle_status(&mut self) {
        match self.current_page {
            Page::Expenses => {
                self.expense_filter.status =
                    cycle_selector(self.expense_filter.status, ExpenseStatus::ALL)
            }
            Page::Tasks => {
                self.task_filter.status = cycle_selector(self.task_filter.status, TaskStatus::ALL)
            }
            Page::Dashboard => return,
        }
        self.refresh();
    }

    /// Type for expenses, priority for tasks
    pub fn cycle_secondary(&mut self) {
        match self.current_page {
            Page::Expenses => {
                self.expense_filter.kind =
                    cycle_selector(self.expense_filter.kind, ExpenseType::ALL)
            }
            Page::Tasks => {
                self.task_filter.priority =
                    cycle_selector(self.task_filter.priority, TaskPriority::ALL)
            }
            Page::Dashboard => return,
        }
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        match self.current_page {
            Page::Expenses => self.expense_filter = ExpenseFilter::new(),
            Page::Tasks => self.task_filter = TaskFilter::new(),
            Page::Dashboard => return,
        }
        self.refresh();
    }

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        self.mode = InputMode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = InputMode::Normal;
    }

    /// Run the simulated submit; the dialog stays open when validation fails
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let toast = dialog.submit(self.submit_delay);
        self.saving = false;
        if toast.is_success() {
            self.close_dialog();
        }
        self.toast = Some(toast);
    }

    /// Write the filtered expenses to `path`
    pub fn export_expenses(&mut self, path: &Path) {
        let result = File::create(path)
            .map_err(household::Error::from)
            .and_then(|file| write_expenses_csv(file, self.filtered_expenses()));

        self.toast = Some(match result {
            Ok(()) => Toast::success(
                "Despesas exportadas",
                format!("{} despesas salvas em {}", self.expense_rows.len(), path.display()),
            ),
            Err(err) => Toast::error("Erro ao exportar", err.to_string()),
        });
    }

    fn table_state(&mut self) -> Option<(&mut TableState, usize)> {
        match self.current_page {
            Page::Expenses => Some((&mut self.expense_state, self.expense_rows.len())),
            Page::Tasks => Some((&mut self.task_state, self.task_rows.len())),
            Page::Dashboard => None,
        }
    }

    pub fn next(&mut self) {
        let Some((state, len)) = self.table_state() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let Some((state, len)) = self.table_state() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.mode {
            InputMode::Normal => {
                if !handle_normal_key(app, key) {
                    return Ok(());
                }
            }
            InputMode::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => app.mode = InputMode::Normal,
                KeyCode::Backspace => app.pop_query(),
                KeyCode::Char(c) => app.push_query(c),
                _ => {}
            },
            InputMode::Dialog => {
                if key.code == KeyCode::Enter {
                    // One "Salvando..." frame before the blocking delay
                    app.saving = true;
                    terminal.draw(|f| ui(f, app))?;
                    app.submit_dialog();
                } else {
                    handle_dialog_key(app, key);
                }
            }
        }
    }
}

/// Returns false when the app should quit
fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Tab => app.next_page(),
        KeyCode::BackTab => app.previous_page(),
        KeyCode::Char('1') => app.current_page = Page::Dashboard,
        KeyCode::Char('2') => app.current_page = Page::Expenses,
        KeyCode::Char('3') => app.current_page = Page::Tasks,
        KeyCode::Char('/') if app.current_page != Page::Dashboard => app.mode = InputMode::Search,
        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char('s') => app.cycle_status(),
        KeyCode::Char('t') => app.cycle_secondary(),
        KeyCode::Char('x') => app.clear_filter(),
        KeyCode::Char('e') => app.open_dialog(Dialog::expense()),
        KeyCode::Char('a') => app.open_dialog(Dialog::task()),
        KeyCode::Char('w') if app.current_page == Page::Expenses => {
            app.export_expenses(Path::new(EXPORT_FILE))
        }
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.previous(),
        _ => {}
    }
    true
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_dialog();
        return;
    }
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => dialog.next_field(),
        KeyCode::BackTab | KeyCode::Up => dialog.previous_field(),
        KeyCode::Left => {
            if let Some(field) = dialog.focused_mut() {
                field.cycle(false);
            }
        }
        KeyCode::Right => {
            if let Some(field) = dialog.focused_mut() {
                field.cycle(true);
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = dialog.focused_mut() {
                if field.options.is_empty() {
                    field.value.pop();
                }
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = dialog.focused_mut() {
                if field.options.is_empty() {
                    field.value.push(c);
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
        Tone::Secondary => Color::Cyan,
        Tone::Outline => Color::White,
    }
}

fn badge_cell<B: Badged>(value: &B) -> Cell<'static> {
    let badge = value.badge();
    Cell::from(badge.label).style(Style::default().fg(tone_color(badge.tone)))
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Expenses => render_expenses(f, chunks[1], app),
        Page::Tasks => render_tasks(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let Some(dialog) = &app.dialog {
        render_dialog(f, dialog, app.saving);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "🏠 Gestão Doméstica  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in [Page::Dashboard, Page::Expenses, Page::Tasks].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_tiles(f: &mut Frame, area: Rect, tiles: &[(&str, String, Color)]) {
    let constraints: Vec<Constraint> = tiles
        .iter()
        .map(|_| Constraint::Ratio(1, tiles.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((title, value, color), cell) in tiles.iter().zip(cells.iter()) {
        let tile = Paragraph::new(Line::from(Span::styled(
            value.clone(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")));
        f.render_widget(tile, *cell);
    }
}

fn selector_label<T>(
    selector: Option<T>,
    all: &'static str,
    label: impl Fn(&T) -> &'static str,
) -> &'static str {
    selector.as_ref().map_or(all, label)
}

fn render_filter_line(f: &mut Frame, area: Rect, app: &App, selectors: [(&str, &str); 3]) {
    let query_style = if app.mode == InputMode::Search {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::styled(" / ", header_style()),
        Span::styled(format!("\"{}\"", app.query()), query_style),
    ];
    for (key, value) in selectors {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(key.to_string(), header_style()));
        spans.push(Span::raw(format!(" {value}")));
    }
    let line = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Filtros e Busca "));
    f.render_widget(line, area);
}

fn render_expenses(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = app.expense_summary();
    render_tiles(
        f,
        chunks[0],
        &[
            ("Total", format!("{} ({})", format_brl(summary.total), summary.count), Color::White),
            (
                "Pagas",
                format!("{} ({})", format_brl(summary.paid), summary.paid_count),
                Color::Green,
            ),
            (
                "Pendentes",
                format!("{} ({})", format_brl(summary.pending), summary.pending_count),
                Color::Yellow,
            ),
        ],
    );

    let filter = &app.expense_filter;
    render_filter_line(
        f,
        chunks[1],
        app,
        [
            ("c", selector_label(filter.category, "Todas", |c| c.label())),
            ("s", selector_label(filter.status, "Todos", |s| s.label())),
            ("t", selector_label(filter.kind, "Todos", |k| k.label())),
        ],
    );

    let header = Row::new(
        ["Despesa", "Categoria", "Responsável", "Data", "Tipo", "Status", "Valor"]
            .into_iter()
            .map(|h| Cell::from(h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows: Vec<Row> = app
        .filtered_expenses()
        .into_iter()
        .map(|expense| {
            Row::new(vec![
                Cell::from(truncate(&expense.name, 28)),
                Cell::from(expense.category.label()),
                Cell::from(expense.responsible.name()),
                Cell::from(format_date(expense.date)),
                badge_cell(&expense.kind),
                badge_cell(&expense.status),
                Cell::from(format_brl(expense.amount)),
            ])
        })
        .collect();

    let title = format!(
        " Lista de Despesas ({} de {}) ",
        app.expense_rows.len(),
        app.household.expenses.len()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[2], &mut app.expense_state);
}

fn render_tasks(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = app.task_summary();
    render_tiles(
        f,
        chunks[0],
        &[
            ("Total", summary.total.to_string(), Color::White),
            ("Concluídas", summary.completed.to_string(), Color::Green),
            ("Em Andamento", summary.in_progress.to_string(), Color::Cyan),
            ("Pendentes", summary.pending.to_string(), Color::Yellow),
        ],
    );

    let filter = &app.task_filter;
    render_filter_line(
        f,
        chunks[1],
        app,
        [
            ("c", selector_label(filter.category, "Todas", |c| c.label())),
            ("s", selector_label(filter.status, "Todos", |s| s.label())),
            ("t", selector_label(filter.priority, "Todas", |p| p.label())),
        ],
    );

    let header = Row::new(
        ["Tarefa", "Categoria", "Responsável", "Vencimento", "Prioridade", "Status"]
            .into_iter()
            .map(|h| Cell::from(h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows: Vec<Row> = app
        .filtered_tasks()
        .into_iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(truncate(&task.title, 30)),
                Cell::from(task.category.label()),
                Cell::from(task.assignee.name()),
                Cell::from(format_date(task.due_date)),
                badge_cell(&task.priority),
                badge_cell(&task.status),
            ])
        })
        .collect();

    let title = format!(
        " Lista de Tarefas ({} de {}) ",
        app.task_rows.len(),
        app.household.tasks.len()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[2], &mut app.task_state);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let household = &app.household;
    let budget = BudgetSummary::new(app.monthly_budget, &household.expenses);
    let categories = spending_by_category(&household.expenses);
    let upcoming = upcoming_tasks(&household.tasks);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let remaining_color = if budget.over_budget { Color::Red } else { Color::Green };
    render_tiles(
        f,
        chunks[0],
        &[
            ("Total Gasto", format_brl(budget.total_spent), Color::White),
            ("Orçamento Restante", format_brl(budget.remaining.abs()), remaining_color),
            ("% Orçamento Usado", format!("{}%", budget.percentage_used), Color::Yellow),
            (
                "Tarefas Pendentes",
                format!("{} ({} alta)", upcoming.tasks.len(), upcoming.high_priority),
                Color::Cyan,
            ),
        ],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Orçamento mensal: {} ",
            format_brl(budget.monthly_budget)
        )))
        .gauge_style(Style::default().fg(remaining_color))
        .percent(budget.percentage_used.min(100) as u16);
    f.render_widget(gauge, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let category_lines: Vec<Line> = categories
        .iter()
        .map(|share| {
            let bar = "█".repeat((share.percentage / 5) as usize);
            Line::from(vec![
                Span::styled(format!(" {:<12}", share.category.label()), header_style()),
                Span::raw(format!("{:>12} {:>3}% ", format_brl(share.amount), share.percentage)),
                Span::styled(bar, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(category_lines)
            .block(Block::default().borders(Borders::ALL).title(" Gastos por Categoria ")),
        columns[0],
    );

    let task_lines: Vec<Line> = upcoming
        .tasks
        .iter()
        .map(|task| {
            let badge = task.priority.badge();
            Line::from(vec![
                Span::raw(format!(" {} ", format_date(task.due_date))),
                Span::styled(
                    truncate(&task.title, 28),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" · {} ", task.assignee.initials())),
                Span::styled(badge.label, Style::default().fg(tone_color(badge.tone))),
            ])
        })
        .collect();
    let upcoming_list = Paragraph::new(task_lines)
        .block(Block::default().borders(Borders::ALL).title(" Próximas Tarefas "));
    f.render_widget(upcoming_list, columns[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(toast) = &app.toast {
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        status_spans.push(Span::styled(
            format!(" {} ", toast.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw(format!("{} | ", toast.description)));
    }

    let hints: &[(&str, &str)] = match app.mode {
        InputMode::Search => &[("Enter", " Done | "), ("Esc", " Done")],
        InputMode::Dialog => &[
            ("↑/↓", " Field | "),
            ("←/→", " Option | "),
            ("Enter", " Save | "),
            ("Esc", " Cancel"),
        ],
        InputMode::Normal => match app.current_page {
            Page::Dashboard => &[("Tab", " Page | "), ("e/a", " New | "), ("q", " Quit")],
            Page::Expenses => &[
                ("/", " Search | "),
                ("c/s/t", " Filter | "),
                ("x", " Clear | "),
                ("e", " New | "),
                ("w", " Export | "),
                ("q", " Quit"),
            ],
            Page::Tasks => &[
                ("/", " Search | "),
                ("c/s/t", " Filter | "),
                ("x", " Clear | "),
                ("a", " New | "),
                ("q", " Quit"),
            ],
        },
    };
    for (key, text) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*text));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn render_dialog(f: &mut Frame, dialog: &Dialog, saving: bool) {
    let area = centered_rect(60, 60, f.size());

    let mut lines = vec![Line::from("")];
    for (i, field) in dialog.fields.iter().enumerate() {
        let focused = i == dialog.focus;
        let marker = if focused { "→ " } else { "  " };
        let value = if field.options.is_empty() {
            field.value.clone()
        } else if field.value.is_empty() {
            "‹ selecionar ›".to_string()
        } else {
            format!("‹ {} ›", field.value)
        };
        let value_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<34}", field.label), Style::default().fg(Color::Cyan)),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(if saving {
        Span::styled(
            "  Salvando...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            "  Enter para salvar, Esc para cancelar",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    }));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(dialog.title()),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut settings = Settings::default();
        settings.app.submit_delay_ms = 0;
        App::new(Household::embedded().unwrap(), &settings)
    }

    fn expense_ids(app: &App) -> Vec<u32> {
        app.filtered_expenses().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_starts_unfiltered_on_dashboard() {
        let app = app();
        assert_eq!(app.current_page, Page::Dashboard);
        assert_eq!(expense_ids(&app), vec![1, 2, 3, 4, 5]);
        assert_eq!(app.task_rows.len(), 5);
        assert_eq!(app.expense_state.selected(), Some(0));
    }

    #[test]
    fn test_typing_a_query_refilters() {
        let mut app = app();
        app.current_page = Page::Expenses;
        for c in "luz".chars() {
            app.push_query(c);
        }
        assert_eq!(expense_ids(&app), vec![2]);
        assert_eq!(app.expense_summary().total, Decimal::new(18050, 2));

        app.pop_query();
        app.pop_query();
        app.pop_query();
        assert_eq!(expense_ids(&app), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cycling_status_on_tasks_page() {
        let mut app = app();
        app.current_page = Page::Tasks;

        app.cycle_status();
        assert_eq!(app.task_filter.status, Some(TaskStatus::Pending));
        app.cycle_status();
        app.cycle_status();
        assert_eq!(app.task_filter.status, Some(TaskStatus::Completed));
        let ids: Vec<u32> = app.filtered_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(app.task_summary().completed, 1);

        app.cycle_status();
        assert_eq!(app.task_filter.status, None);
        assert_eq!(app.task_rows.len(), 5);
    }

    #[test]
    fn test_empty_result_clears_selection() {
        let mut app = app();
        app.current_page = Page::Expenses;
        app.expense_filter = ExpenseFilter::new().query("nada disso");
        app.refresh();

        assert!(app.expense_rows.is_empty());
        assert_eq!(app.expense_state.selected(), None);
        assert_eq!(app.expense_summary(), ExpenseSummary::default());

        app.clear_filter();
        assert_eq!(app.expense_rows.len(), 5);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app();
        app.current_page = Page::Expenses;
        app.previous();
        assert_eq!(app.expense_state.selected(), Some(4));
        app.next();
        assert_eq!(app.expense_state.selected(), Some(0));
    }

    #[test]
    fn test_page_navigation() {
        let mut app = app();
        app.next_page();
        assert_eq!(app.current_page, Page::Expenses);
        app.previous_page();
        app.previous_page();
        assert_eq!(app.current_page, Page::Tasks);
    }

    #[test]
    fn test_dialog_submit_success_closes_dialog() {
        let mut app = app();
        let mut dialog = Dialog::expense();
        dialog.fields[0].value = "Farmácia".to_string();
        dialog.fields[1].value = "32,40".to_string();
        app.open_dialog(dialog);

        app.submit_dialog();

        let toast = app.toast.clone().unwrap();
        assert!(toast.is_success());
        assert_eq!(toast.title, "Despesa registrada com sucesso!");
        assert!(app.dialog.is_none());
        assert_eq!(app.mode, InputMode::Normal);
        // Submissions never reach the store
        assert_eq!(app.household.expenses.len(), 5);
    }

    #[test]
    fn test_dialog_submit_failure_keeps_dialog_open() {
        let mut app = app();
        app.open_dialog(Dialog::task());

        app.submit_dialog();

        assert!(!app.toast.clone().unwrap().is_success());
        assert!(app.dialog.is_some());
        assert_eq!(app.mode, InputMode::Dialog);
    }

    #[test]
    fn test_choice_field_cycles_through_placeholder() {
        let mut field = FormField::choice("type", "Tipo", vec!["Fixo", "Variável"]);
        field.cycle(true);
        assert_eq!(field.value, "Fixo");
        field.cycle(true);
        field.cycle(true);
        assert_eq!(field.value, "");
        field.cycle(false);
        assert_eq!(field.value, "Variável");
    }

    #[test]
    fn test_export_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut app = app();
        app.current_page = Page::Expenses;
        app.expense_filter = ExpenseFilter::new().status(ExpenseStatus::Pending);
        app.refresh();

        app.export_expenses(&path);

        assert!(app.toast.clone().unwrap().is_success());
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("Revisar orçamento mensal", 10), "Revisar...");
        assert_eq!(truncate("Casa", 10), "Casa");
    }
}
