// Testes de ponta a ponta contra o Postgres: cada caso recebe um banco novo
// com as migrações aplicadas (precisa de DATABASE_URL).

mod common;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use crm_api::{create_router, AppState};
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{request, send, TOKEN};

fn app(pool: PgPool) -> Router {
    create_router(AppState::with_pool(pool, TOKEN))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request(Method::GET, uri, Some(TOKEN), None)).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request(Method::POST, uri, Some(TOKEN), Some(body))).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request(Method::PUT, uri, Some(TOKEN), Some(body))).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request(Method::DELETE, uri, Some(TOKEN), None)).await
}

async fn create_customer(app: &Router, name: &str) -> String {
    let (status, body) = post(app, "/api/customers", json!({ "name": name, "email": "ana@email.com" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["customer_id"].as_str().unwrap().to_string()
}

fn rows(body: &Value) -> &Vec<Value> {
    body.as_array().expect("listagem deve ser um array")
}

/// Campos cujo valor mudou entre duas versões do mesmo registro.
fn changed_fields(before: &Value, after: &Value) -> Vec<String> {
    let mut changed: Vec<String> = before
        .as_object()
        .unwrap()
        .iter()
        .filter(|(key, value)| after.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    changed.sort();
    changed
}

#[sqlx::test(migrations = "./migrations")]
async fn created_customer_is_fetched_unchanged(pool: PgPool) {
    let app = app(pool);

    let (status, created) = post(
        &app,
        "/api/customers",
        json!({ "name": "Maria da Silva", "email": "maria@email.com", "phone": "+46 70 123 45 67" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["created_at"], created["updated_at"]);

    let uri = format!("/api/customers/{}", created["customer_id"].as_str().unwrap());
    let (status, fetched) = get(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "./migrations")]
async fn new_lead_has_equal_timestamps_and_default_status(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;

    let (status, lead) = post(&app, "/api/leads", json!({ "customer_id": customer_id, "urgency_score": 5 })).await;

    assert_eq!(status, StatusCode::OK, "{}", lead);
    assert_eq!(lead["created_at"], lead["updated_at"]);
    assert_eq!(lead["status"], "new");
    assert_eq!(lead["customer_id"], customer_id.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn status_update_changes_only_status_and_updated_at(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    let (_, before) = post(
        &app,
        "/api/leads",
        json!({ "customer_id": customer_id, "intent": "service", "channel": "email", "urgency": "high" }),
    )
    .await;
    let uri = format!("/api/leads/{}", before["lead_id"].as_str().unwrap());

    let (status, after) = put(&app, &uri, json!({ "status": "won" })).await;

    assert_eq!(status, StatusCode::OK, "{}", after);
    assert_eq!(after["status"], "won");
    assert_eq!(changed_fields(&before, &after), vec!["status", "updated_at"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_patch_leaves_the_record_as_it_was(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    let uri = format!("/api/customers/{}", customer_id);
    let (_, before) = get(&app, &uri).await;

    let (status, _) = put(&app, &uri, json!({})).await;
    let (_, after) = get(&app, &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(after, before);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_customer_removes_leads_and_unlinks_inbox(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    let (_, lead) = post(&app, "/api/leads", json!({ "customer_id": customer_id })).await;
    let (_, message) = post(
        &app,
        "/api/inbox",
        json!({ "source": "website_form", "message_raw": "Olá", "customer_id": customer_id }),
    )
    .await;
    assert_eq!(message["customer_id"], customer_id.as_str());

    let (status, body) = delete(&app, &format!("/api/customers/{}", customer_id)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, _) = get(&app, &format!("/api/customers/{}", customer_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/api/leads/{}", lead["lead_id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, message) = get(&app, &format!("/api/inbox/{}", message["inbox_id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(message["customer_id"].is_null());

    let (status, _) = delete(&app, &format!("/api/customers/{}", customer_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn repeated_lead_with_same_dedupe_key_is_stored_once(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    let payload = json!({ "customer_id": customer_id, "dedupe_key": "form-42", "summary": "Revisão" });

    let (first_status, first) = post(&app, "/api/leads", payload.clone()).await;
    let (second_status, second) = post(&app, "/api/leads", payload).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(second, first);

    let (_, listed) = get(&app, &format!("/api/leads?customer_id={}", customer_id)).await;
    assert_eq!(rows(&listed).len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn repeated_inbox_message_with_same_dedupe_key_is_stored_once(pool: PgPool) {
    let app = app(pool);
    let payload = json!({ "source": "email", "message_raw": "Preciso de orçamento", "dedupe_key": "msg-7" });

    let (_, first) = post(&app, "/api/inbox", payload.clone()).await;
    let (status, second) = post(&app, "/api/inbox", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["inbox_id"], first["inbox_id"]);
    assert_eq!(first["status"], "unread");

    let (_, listed) = get(&app, "/api/inbox").await;
    assert_eq!(rows(&listed).len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn unlinked_only_wins_over_customer_filter(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    post(&app, "/api/inbox", json!({ "source": "email", "customer_id": customer_id })).await;
    post(&app, "/api/inbox", json!({ "source": "email" })).await;

    let (status, listed) = get(
        &app,
        &format!("/api/inbox?unlinked_only=true&customer_id={}", customer_id),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows(&listed).len(), 1);
    assert!(rows(&listed).iter().all(|m| m["customer_id"].is_null()));

    let (_, linked) = get(&app, &format!("/api/inbox?customer_id={}", customer_id)).await;
    assert_eq!(rows(&linked).len(), 1);
    assert_eq!(rows(&linked)[0]["customer_id"], customer_id.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn listings_never_exceed_the_limit(pool: PgPool) {
    let app = app(pool);
    for n in 0..3 {
        post(&app, "/api/inbox", json!({ "source": "email", "message_raw": format!("mensagem {}", n) })).await;
    }

    let (_, two) = get(&app, "/api/inbox?limit=2").await;
    assert_eq!(rows(&two).len(), 2);

    // Fora da faixa: limit é ajustado para [1, 1000]
    let (status, one) = get(&app, "/api/inbox?limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows(&one).len(), 1);

    let (_, all) = get(&app, "/api/inbox?limit=5000&offset=-1").await;
    assert_eq!(rows(&all).len(), 3);

    let (_, rest) = get(&app, "/api/inbox?limit=2&offset=2").await;
    assert_eq!(rows(&rest).len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn blank_filters_return_the_same_rows_as_no_filters(pool: PgPool) {
    let app = app(pool);
    let customer_id = create_customer(&app, "Ana").await;
    post(&app, "/api/leads", json!({ "customer_id": customer_id, "channel": "email" })).await;
    post(&app, "/api/inbox", json!({ "source": "email", "channel": "email", "customer_id": customer_id })).await;

    for uri in [
        "/api/leads?channel=",
        "/api/leads?status=&urgency=&customer_id=&intent=",
        "/api/inbox?customer_id=&status=&type=&source=&channel=&unlinked_only=",
        "/api/customers/overview?q=&has_unread=&has_open_leads=",
    ] {
        let (status, listed) = get(&app, uri).await;

        assert_eq!(status, StatusCode::OK, "{}: {}", uri, listed);
        assert_eq!(rows(&listed).len(), 1, "{}", uri);
    }

    let (_, none) = get(&app, "/api/leads?channel=whatsapp").await;
    assert!(rows(&none).is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn overview_reflects_unread_messages_and_open_leads(pool: PgPool) {
    let app = app(pool);
    let busy = create_customer(&app, "Ana").await;
    create_customer(&app, "Bruno").await;
    post(
        &app,
        "/api/inbox",
        json!({ "source": "email", "customer_id": busy, "ai_json": { "vehicle_type": "caravan" } }),
    )
    .await;
    post(&app, "/api/leads", json!({ "customer_id": busy, "status": "quoted" })).await;

    let (_, unread) = get(&app, "/api/customers/overview?has_unread=true").await;
    assert_eq!(rows(&unread).len(), 1);
    assert_eq!(rows(&unread)[0]["customer_id"], busy.as_str());
    assert_eq!(rows(&unread)[0]["unread_messages"], 1);
    assert_eq!(rows(&unread)[0]["open_leads"], 1);
    assert_eq!(rows(&unread)[0]["latest_vehicle_type"], "caravan");

    let (_, quiet) = get(&app, "/api/customers/overview?has_open_leads=false").await;
    assert_eq!(rows(&quiet).len(), 1);
    assert_eq!(rows(&quiet)[0]["name"], "Bruno");
}

#[sqlx::test(migrations = "./migrations")]
async fn lead_for_unknown_customer_is_bad_request(pool: PgPool) {
    let app = app(pool);

    let (status, body) = post(
        &app,
        "/api/leads",
        json!({ "customer_id": "6f1c2b1e-4a7d-4c55-9a0e-2d1f0b3c4d5e" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}
