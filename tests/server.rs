//! HTTP routes, driven through the router without binding a socket
#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use household::{router, AppState, Household, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let mut settings = Settings::default();
    settings.app.submit_delay_ms = 0;
    router(AppState::new(Household::embedded().unwrap(), settings))
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(uri: &str) -> (StatusCode, String) {
    send(Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(request).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn post_form(uri: &str, body: &'static str) -> (StatusCode, String) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(request).await
}

fn ids(items: &Value) -> Vec<u64> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_expense_query_selects_conta_de_luz() {
    let (status, body) = get_json("/api/expenses?q=luz").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(ids(&data["expenses"]), vec![2]);
    assert_eq!(data["expenses"][0]["name"], "Conta de Luz");
    assert_eq!(data["summary"]["count"], 1);
    assert_eq!(data["summary"]["total"], "180.50");
    assert_eq!(data["total_records"], 5);
}

#[tokio::test]
async fn test_all_sentinels_return_full_store() {
    let (status, body) = get_json("/api/expenses?q=&category=all&status=all&type=all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["expenses"]), vec![1, 2, 3, 4, 5]);
    assert_eq!(body["data"]["summary"]["total"], "701.20");
}

#[tokio::test]
async fn test_completed_tasks() {
    let (status, body) = get_json("/api/tasks?status=completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["tasks"]), vec![3]);
    assert_eq!(body["data"]["tasks"][0]["dueDate"], "2024-08-05");
    assert_eq!(body["data"]["summary"]["completed"], 1);
    assert_eq!(body["data"]["summary"]["total"], 1);
}

#[tokio::test]
async fn test_query_matching_nothing_has_zero_aggregates() {
    let (_, body) = get_json("/api/tasks?q=inexistente").await;
    assert_eq!(ids(&body["data"]["tasks"]), Vec::<u64>::new());
    assert_eq!(body["data"]["summary"]["total"], 0);
    assert_eq!(body["data"]["summary"]["pending"], 0);
}

#[tokio::test]
async fn test_unknown_selector_is_bad_request() {
    let (status, body) = get_json("/api/expenses?status=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn test_dashboard_data() {
    let (status, body) = get_json("/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["budget"]["percentage_used"], 20);
    assert_eq!(data["budget"]["over_budget"], false);
    assert_eq!(data["categories"][0]["category"], "Casa");
    assert_eq!(ids(&data["upcoming"]["tasks"]), vec![4, 1, 2, 5]);
    assert_eq!(data["upcoming"]["high_priority"], 1);
}

#[tokio::test]
async fn test_csv_export_follows_filter() {
    let response = app()
        .oneshot(
            Request::get("/api/expenses/export.csv?category=Casa")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2,Conta de Luz,180.50,Casa"));
}

#[tokio::test]
async fn test_api_expense_submit_succeeds() {
    let (status, body) = post_json(
        "/api/expenses",
        json!({ "name": "Farmácia", "amount": "32,40", "date": "2024-08-07" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["kind"], "success");
    assert_eq!(body["data"]["title"], "Despesa registrada com sucesso!");
    assert_eq!(
        body["data"]["description"],
        "Farmácia no valor de R$ 32,40 foi registrada."
    );

    // Submissions are discarded
    let (_, list) = get_json("/api/expenses").await;
    assert_eq!(list["data"]["total_records"], 5);
}

#[tokio::test]
async fn test_api_task_submit_without_title_is_rejected() {
    let (status, body) = post_json("/api/tasks", json!({ "dueDate": "2024-08-20" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["kind"], "error");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_api_unknown_category_is_an_error_toast() {
    let (status, body) = post_json(
        "/api/expenses",
        json!({ "name": "Hotel", "amount": "1", "date": "2024-08-01", "category": "Viagem" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["kind"], "error");
    assert_eq!(body["data"]["title"], "Erro ao registrar despesa");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Categoria"));
    assert!(error.contains("Viagem"));
}

#[tokio::test]
async fn test_api_expense_submit_accepts_labels() {
    let (status, body) = post_json(
        "/api/expenses",
        json!({
            "name": "Academia",
            "amount": "99,90",
            "date": "2024-08-10",
            "category": "Saúde",
            "responsible": "Ana Silva",
            "type": "Fixo",
            "recurring": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_api_malformed_body_keeps_envelope() {
    let request = Request::post("/api/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = send(request).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["title"], "Erro ao criar tarefa");
}

// ============================================================================
// HTML views
// ============================================================================

#[tokio::test]
async fn test_landing_page() {
    let (status, html) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Gestão Doméstica Simplificada"));
}

#[tokio::test]
async fn test_auth_pages_have_no_sidebar() {
    let (status, html) = get("/login").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Bem-vindo de volta"));
    assert!(!html.contains("<nav>"));

    let (status, html) = get("/register").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Criar Conta"));
}

#[tokio::test]
async fn test_dashboard_aliases() {
    for path in ["/dashboard", "/reports", "/family", "/home", "/analytics", "/settings"] {
        let (status, html) = get(path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(html.contains("Gastos por Categoria"), "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, html) = get("/calendar").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Página não encontrada"));
}

#[tokio::test]
async fn test_expenses_page_with_filter_and_trailing_slash() {
    let (status, html) = get("/expenses/?q=luz").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Conta de Luz"));
    assert!(html.contains("1 de 5 despesas"));
}

#[tokio::test]
async fn test_tasks_page_rejects_unknown_priority() {
    let (status, _) = get("/tasks?priority=urgente").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expense_form_post_shows_success_toast() {
    let (status, html) = post_form(
        "/expenses",
        concat!(
            "name=Farm%C3%A1cia&amount=32.40&date=2024-08-07",
            "&category=Sa%C3%BAde&responsible=&type=variable"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Despesa registrada com sucesso!"));
    assert!(html.contains("5 de 5 despesas"));
}

#[tokio::test]
async fn test_task_form_post_without_title_is_unprocessable() {
    let (status, html) = post_form("/tasks", "title=&dueDate=2024-08-20&priority=").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("toast-error"));
}
