// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use household::export::write_expenses_csv;
use household::filter::{ExpenseFilter, ExpenseParams, Filter, TaskFilter, TaskParams};
use household::labels::{format_brl, format_date};
use household::summary::{BudgetSummary, ExpenseSummary, TaskSummary};
use household::{Household, Settings};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Household Manager - expenses and chores for the whole family
#[derive(Parser, Debug)]
#[command(name = "household", version, about = "Household expenses and tasks")]
struct Cli {
    /// Settings file (defaults to ./household.toml when present)
    #[arg(long, global = true, env = "HOUSEHOLD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,

    /// Print a filtered list
    List {
        #[command(subcommand)]
        what: ListTarget,
    },

    /// Print the expense, task and budget summaries
    Summary,

    /// Write expenses as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        filter: ExpenseArgs,
    },
}

#[derive(Subcommand, Debug)]
enum ListTarget {
    Expenses(ExpenseArgs),
    Tasks(TaskArgs),
}

#[derive(Args, Debug, Default)]
struct ExpenseArgs {
    /// Matches name or responsible person, ignoring case
    #[arg(short, long)]
    query: Option<String>,
    /// Category (e.g. Casa), or "all"
    #[arg(long)]
    category: Option<String>,
    /// paid | pending | all
    #[arg(long)]
    status: Option<String>,
    /// fixed | recurring | variable | all
    #[arg(long = "type")]
    kind: Option<String>,
}

impl ExpenseArgs {
    fn to_filter(&self) -> Result<ExpenseFilter> {
        let params = ExpenseParams {
            q: self.query.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            kind: self.kind.clone(),
        };
        Ok(ExpenseFilter::try_from(&params)?)
    }
}

#[derive(Args, Debug, Default)]
struct TaskArgs {
    /// Matches title or assignee, ignoring case
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// pending | in_progress | completed | all
    #[arg(long)]
    status: Option<String>,
    /// high | medium | low | all
    #[arg(long)]
    priority: Option<String>,
}

impl TaskArgs {
    fn to_filter(&self) -> Result<TaskFilter> {
        let params = TaskParams {
            q: self.query.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
        };
        Ok(TaskFilter::try_from(&params)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so logging is opt-in through RUST_LOG
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let household =
        Household::load(settings.app.data_dir.as_deref()).context("Failed to load household data")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(household, &settings),
        Command::List { what } => match what {
            ListTarget::Expenses(args) => list_expenses(&household, &args),
            ListTarget::Tasks(args) => list_tasks(&household, &args),
        },
        Command::Summary => {
            print_summary(&household, &settings);
            Ok(())
        }
        Command::Export { out, filter } => export(&household, &filter, out),
    }
}

fn list_expenses(household: &Household, args: &ExpenseArgs) -> Result<()> {
    let filter = args.to_filter()?;
    let expenses = filter.apply(&household.expenses);

    for expense in &expenses {
        println!(
            "{:>3}  {:<24} {:<12} {:<12} {}  {:<10} {:<8} {:>12}",
            expense.id,
            expense.name,
            expense.category.label(),
            expense.responsible.name(),
            format_date(expense.date),
            expense.kind.label(),
            expense.status.label(),
            format_brl(expense.amount)
        );
    }

    let summary = ExpenseSummary::from_records(expenses.iter().copied());
    println!(
        "{} de {} despesas · Total {} · Pagas {} · Pendentes {}",
        summary.count,
        household.expenses.len(),
        format_brl(summary.total),
        format_brl(summary.paid),
        format_brl(summary.pending)
    );
    Ok(())
}

fn list_tasks(household: &Household, args: &TaskArgs) -> Result<()> {
    let filter = args.to_filter()?;
    let tasks = filter.apply(&household.tasks);

    for task in &tasks {
        println!(
            "{:>3}  {:<26} {:<12} {:<12} {}  {:<6} {}",
            task.id,
            task.title,
            task.category.label(),
            task.assignee.name(),
            format_date(task.due_date),
            task.priority.label(),
            task.status.label()
        );
    }

    let summary = TaskSummary::from_records(tasks.iter().copied());
    println!(
        "{} de {} tarefas · Pendentes {} · Em Andamento {} · Concluídas {}",
        summary.total,
        household.tasks.len(),
        summary.pending,
        summary.in_progress,
        summary.completed
    );
    Ok(())
}

fn print_summary(household: &Household, settings: &Settings) {
    let expenses = ExpenseSummary::from_records(&household.expenses);
    let tasks = TaskSummary::from_records(&household.tasks);
    let budget = BudgetSummary::new(settings.app.monthly_budget, &household.expenses);

    println!("💸 Despesas: {} ({})", format_brl(expenses.total), expenses.count);
    println!("   Pagas:     {} ({})", format_brl(expenses.paid), expenses.paid_count);
    println!("   Pendentes: {} ({})", format_brl(expenses.pending), expenses.pending_count);
    println!(
        "📊 Orçamento: {} usado de {} ({}%)",
        format_brl(budget.total_spent),
        format_brl(budget.monthly_budget),
        budget.percentage_used
    );
    println!(
        "✅ Tarefas: {} · Pendentes {} · Em Andamento {} · Concluídas {}",
        tasks.total, tasks.pending, tasks.in_progress, tasks.completed
    );
}

fn export(household: &Household, args: &ExpenseArgs, out: Option<PathBuf>) -> Result<()> {
    let filter = args.to_filter()?;
    let expenses = filter.apply(&household.expenses);

    match out {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_expenses_csv(file, expenses)?;
            eprintln!("✓ Exported to {}", path.display());
        }
        None => write_expenses_csv(io::stdout().lock(), expenses)?,
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(household: Household, settings: &Settings) -> Result<()> {
    let mut app = ui::App::new(household, settings);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_household: Household, _settings: &Settings) -> Result<()> {
    anyhow::bail!("TUI mode not available; rebuild with `--features tui` or use `household list`")
}
