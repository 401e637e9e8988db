// 🌐 Web front-end: HTML views plus a small JSON API
//
// The stores are loaded once and shared read-only; handlers never lock.
// Every GET page is dispatched through `Route::resolve`, so the HTML side
// follows the same route table as the rest of the crate.

use axum::{
    extract::{rejection::JsonRejection, Form, Json, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::entities::{Expense, Task};
use crate::error::Error;
use crate::export::expenses_to_csv;
use crate::filter::{ExpenseFilter, ExpenseParams, Filter, TaskFilter, TaskParams};
use crate::forms::{
    draft_from_fields, submit, Draft, ExpenseDraft, ExpenseFields, FormError, TaskDraft,
    TaskFields, Toast,
};
use crate::pages::{self, DashboardView, ExpensesView, TasksView};
use crate::routes::Route;
use crate::settings::Settings;
use crate::store::Household;
use crate::summary::{
    spending_by_category, upcoming_tasks, BudgetSummary, CategoryShare, ExpenseSummary,
    TaskSummary, UpcomingTasks,
};

/// Shared application state
pub struct AppState {
    pub household: Household,
    pub settings: Settings,
}

impl AppState {
    pub fn new(household: Household, settings: Settings) -> Self {
        Self { household, settings }
    }
}

type SharedState = Arc<AppState>;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct ExpensesResponse<'a> {
    expenses: Vec<&'a Expense>,
    summary: ExpenseSummary,
    total_records: usize,
}

#[derive(Serialize)]
struct TasksResponse<'a> {
    tasks: Vec<&'a Task>,
    summary: TaskSummary,
    total_records: usize,
}

#[derive(Serialize)]
struct DashboardResponse<'a> {
    budget: BudgetSummary,
    categories: Vec<CategoryShare>,
    upcoming: UpcomingTasks<'a>,
}

/// Union of the expense and task selectors a page URL may carry
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub priority: Option<String>,
}

impl PageParams {
    fn expenses(&self) -> ExpenseParams {
        ExpenseParams {
            q: self.q.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            kind: self.kind.clone(),
        }
    }

    fn tasks(&self) -> TaskParams {
        TaskParams {
            q: self.q.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
        }
    }
}

fn bad_request(err: Error) -> Response {
    tracing::warn!(error = %err, "rejected selector");
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(err.to_string()))).into_response()
}

/// 200 for a success toast, 422 for a validation failure
fn toast_status(toast: &Toast) -> StatusCode {
    if toast.is_success() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

// ============================================================================
// HTML rendering
// ============================================================================

fn render_expenses(
    state: &AppState,
    path: &str,
    filter: &ExpenseFilter,
    toast: Option<&Toast>,
) -> String {
    let store = &state.household.expenses;
    let rows = filter.apply(store);
    let summary = ExpenseSummary::from_records(rows.iter().copied());
    pages::expenses(
        path,
        &ExpensesView {
            filter,
            expenses: &rows,
            summary: &summary,
            store_len: store.len(),
            toast,
        },
    )
}

fn render_tasks(
    state: &AppState,
    path: &str,
    filter: &TaskFilter,
    toast: Option<&Toast>,
) -> String {
    let store = &state.household.tasks;
    let rows = filter.apply(store);
    let summary = TaskSummary::from_records(rows.iter().copied());
    pages::tasks(
        path,
        &TasksView {
            filter,
            tasks: &rows,
            summary: &summary,
            store_len: store.len(),
            toast,
        },
    )
}

fn render_dashboard(state: &AppState, path: &str) -> String {
    let household = &state.household;
    let budget = BudgetSummary::new(state.settings.app.monthly_budget, &household.expenses);
    let categories = spending_by_category(&household.expenses);
    let upcoming = upcoming_tasks(&household.tasks);
    pages::dashboard(
        path,
        &DashboardView {
            budget: &budget,
            categories: &categories,
            upcoming: &upcoming,
        },
    )
}

// ============================================================================
// HTML handlers
// ============================================================================

/// Every GET page, resolved through the route table
async fn page(
    State(state): State<SharedState>,
    uri: Uri,
    Query(params): Query<PageParams>,
) -> Response {
    let path = uri.path();
    match Route::resolve(path) {
        Route::Landing => Html(pages::landing(path)).into_response(),
        Route::Login => Html(pages::login()).into_response(),
        Route::Register => Html(pages::register()).into_response(),
        Route::Dashboard => Html(render_dashboard(&state, path)).into_response(),
        Route::Expenses => match ExpenseFilter::try_from(&params.expenses()) {
            Ok(filter) => Html(render_expenses(&state, path, &filter, None)).into_response(),
            Err(err) => bad_request(err),
        },
        Route::Tasks => match TaskFilter::try_from(&params.tasks()) {
            Ok(filter) => Html(render_tasks(&state, path, &filter, None)).into_response(),
            Err(err) => bad_request(err),
        },
        Route::NotFound => {
            tracing::debug!(path, "no route");
            (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
        }
    }
}

async fn submit_draft<D, F>(state: &AppState, fields: F) -> Toast
where
    D: Draft + TryFrom<F, Error = FormError>,
{
    match draft_from_fields::<D, F>(fields) {
        Ok(draft) => submit(&draft, state.settings.submit_delay()).await,
        Err(toast) => toast,
    }
}

/// POST /expenses - "Nova Despesa" dialog
async fn post_expense_form(
    State(state): State<SharedState>,
    Form(fields): Form<ExpenseFields>,
) -> Response {
    let toast = submit_draft::<ExpenseDraft, _>(&state, fields).await;
    let html = render_expenses(&state, "/expenses", &ExpenseFilter::new(), Some(&toast));
    (toast_status(&toast), Html(html)).into_response()
}

/// POST /tasks - "Nova Tarefa" dialog
async fn post_task_form(
    State(state): State<SharedState>,
    Form(fields): Form<TaskFields>,
) -> Response {
    let toast = submit_draft::<TaskDraft, _>(&state, fields).await;
    let html = render_tasks(&state, "/tasks", &TaskFilter::new(), Some(&toast));
    (toast_status(&toast), Html(html)).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/expenses - filtered expenses with their summary
async fn list_expenses(
    State(state): State<SharedState>,
    Query(params): Query<ExpenseParams>,
) -> Response {
    let filter = match ExpenseFilter::try_from(&params) {
        Ok(filter) => filter,
        Err(err) => return bad_request(err),
    };
    let store = &state.household.expenses;
    let expenses = filter.apply(store);
    let response = ExpensesResponse {
        summary: ExpenseSummary::from_records(expenses.iter().copied()),
        expenses,
        total_records: store.len(),
    };
    Json(ApiResponse::ok(response)).into_response()
}

/// GET /api/expenses/export.csv - filtered expenses as CSV
async fn export_expenses(
    State(state): State<SharedState>,
    Query(params): Query<ExpenseParams>,
) -> Response {
    let filter = match ExpenseFilter::try_from(&params) {
        Ok(filter) => filter,
        Err(err) => return bad_request(err),
    };
    match expenses_to_csv(filter.apply(&state.household.expenses)) {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"despesas.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(err.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/tasks - filtered tasks with their summary
async fn list_tasks(
    State(state): State<SharedState>,
    Query(params): Query<TaskParams>,
) -> Response {
    let filter = match TaskFilter::try_from(&params) {
        Ok(filter) => filter,
        Err(err) => return bad_request(err),
    };
    let store = &state.household.tasks;
    let tasks = filter.apply(store);
    let response = TasksResponse {
        summary: TaskSummary::from_records(tasks.iter().copied()),
        tasks,
        total_records: store.len(),
    };
    Json(ApiResponse::ok(response)).into_response()
}

/// GET /api/dashboard - budget, spending by category and upcoming tasks
async fn dashboard_data(State(state): State<SharedState>) -> Response {
    let household = &state.household;
    let response = DashboardResponse {
        budget: BudgetSummary::new(state.settings.app.monthly_budget, &household.expenses),
        categories: spending_by_category(&household.expenses),
        upcoming: upcoming_tasks(&household.tasks),
    };
    Json(ApiResponse::ok(response)).into_response()
}

fn toast_response(toast: Toast) -> Response {
    let status = toast_status(&toast);
    let body = ApiResponse {
        success: toast.is_success(),
        error: (!toast.is_success()).then(|| toast.description.clone()),
        data: toast,
    };
    (status, Json(body)).into_response()
}

/// JSON bodies share the form fields; a body that does not even parse is
/// reported with the same error toast as a rejected draft
async fn submit_json<D, F>(state: &AppState, body: Result<Json<F>, JsonRejection>) -> Response
where
    D: Draft + TryFrom<F, Error = FormError>,
{
    match body {
        Ok(Json(fields)) => toast_response(submit_draft::<D, F>(state, fields).await),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable draft body");
            toast_response(Toast::error(D::ERROR_TITLE, rejection.body_text()))
        }
    }
}

/// POST /api/expenses - simulated expense submission
async fn create_expense(
    State(state): State<SharedState>,
    body: Result<Json<ExpenseFields>, JsonRejection>,
) -> Response {
    submit_json::<ExpenseDraft, _>(&state, body).await
}

/// POST /api/tasks - simulated task submission
async fn create_task(
    State(state): State<SharedState>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> Response {
    submit_json::<TaskDraft, _>(&state, body).await
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/export.csv", get(export_expenses))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/dashboard", get(dashboard_data));

    Router::new()
        .route("/expenses", get(page).post(post_expense_form))
        .route("/tasks", get(page).post(post_task_form))
        .nest("/api", api_routes)
        .fallback(page)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
