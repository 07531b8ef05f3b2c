use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use todoboard_gateway::{GatewayError, NewTask, TaskGateway, TaskUpdate, TodoistClient};
use tokio::net::TcpListener;

const TOKEN: &str = "test-token";

#[derive(Default)]
struct Recorded {
    bodies: Vec<(String, Value)>,
    deleted: Vec<String>,
    closed: Vec<String>,
}

type Shared = Arc<Mutex<Recorded>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn task_json(id: &str, content: &str, labels: Value) -> Value {
    json!({
        "id": id,
        "content": content,
        "project_id": "2203306141",
        "parent_id": null,
        "labels": labels,
        "due": null,
        "url": format!("https://todoist.com/showTask?id={id}"),
        "priority": 1,
        "is_completed": false
    })
}

async fn list_tasks(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!([
        task_json("1", "Write report", json!(["KANBAN_TODO"])),
        {
            "id": "2",
            "content": "Proofread",
            "project_id": "2203306141",
            "parent_id": "1",
            "labels": [],
            "due": {"date": "2024-03-04", "string": "Mar 4", "is_recurring": false},
            "url": "https://todoist.com/showTask?id=2"
        }
    ])))
}

async fn list_projects() -> Json<Value> {
    Json(json!([
        {"id": "2203306141", "name": "Inbox", "color": "grey"},
        {"id": "2203306142", "name": "Work", "color": "red"}
    ]))
}

async fn create_task(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let content = body["content"].as_str().unwrap_or_default().to_string();
    state.lock().bodies.push(("create".into(), body));
    Json(task_json("99", &content, json!([])))
}

async fn update_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if id == "404" {
        return Err(StatusCode::NOT_FOUND);
    }
    let labels = body.get("labels").cloned().unwrap_or(json!([]));
    state.lock().bodies.push((id.clone(), body));
    Ok(Json(task_json(&id, "Updated", labels)))
}

async fn delete_task(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    state.lock().deleted.push(id);
    StatusCode::NO_CONTENT
}

async fn close_task(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    if id == "404" {
        return StatusCode::NOT_FOUND;
    }
    state.lock().closed.push(id);
    StatusCode::NO_CONTENT
}

async fn spawn_service() -> (String, Shared) {
    let state: Shared = Arc::default();
    let app = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", post(update_task).delete(delete_task))
        .route("/tasks/{id}/close", post(close_task))
        .route("/projects", get(list_projects))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn lists_tasks_and_projects() {
    let (url, _) = spawn_service().await;
    let client = TodoistClient::with_base_url(TOKEN, url);

    let tasks = client.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].labels, ["KANBAN_TODO"]);
    assert_eq!(tasks[1].parent_id.as_deref(), Some("1"));
    assert_eq!(tasks[1].due.as_ref().unwrap().date.to_string(), "2024-03-04");

    let projects = client.list_projects().await.unwrap();
    let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Inbox", "Work"]);
}

#[tokio::test]
async fn wrong_token_is_a_status_error() {
    let (url, _) = spawn_service().await;
    let client = TodoistClient::with_base_url("nope", url);

    let err = client.list_tasks().await.unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 401, .. }));
}

#[tokio::test]
async fn create_sends_content_parent_and_due() {
    let (url, state) = spawn_service().await;
    let client = TodoistClient::with_base_url(TOKEN, url);

    let new_task = NewTask::parse("Ship it | tomorrow 5pm", Some("1".into())).unwrap();
    let created = client.create_task(new_task).await.unwrap();
    assert_eq!(created.id, "99");
    assert_eq!(created.content, "Ship it");

    let recorded = state.lock();
    let (_, body) = &recorded.bodies[0];
    assert_eq!(
        body,
        &json!({"content": "Ship it", "parent_id": "1", "due_string": "tomorrow 5pm"})
    );
}

#[tokio::test]
async fn update_sends_only_labels() {
    let (url, state) = spawn_service().await;
    let client = TodoistClient::with_base_url(TOKEN, url);

    let labels = vec!["home".to_string(), "KANBAN_DONE".to_string()];
    let updated = client
        .update_task("1".into(), TaskUpdate::labels(labels.clone()))
        .await
        .unwrap();
    assert_eq!(updated.labels, labels);

    let recorded = state.lock();
    assert_eq!(
        recorded.bodies,
        vec![("1".to_string(), json!({"labels": ["home", "KANBAN_DONE"]}))]
    );
}

#[tokio::test]
async fn missing_task_maps_to_not_found() {
    let (url, _) = spawn_service().await;
    let client = TodoistClient::with_base_url(TOKEN, url);

    let err = client
        .update_task("404".into(), TaskUpdate::labels(vec![]))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::TaskNotFound("404".into()));

    let err = client.close_task("404".into()).await.unwrap_err();
    assert_eq!(err, GatewayError::TaskNotFound("404".into()));
}

#[tokio::test]
async fn delete_and_close_hit_their_endpoints() {
    let (url, state) = spawn_service().await;
    let client = TodoistClient::with_base_url(TOKEN, url);

    client.delete_task("5".into()).await.unwrap();
    client.close_task("6".into()).await.unwrap();

    let recorded = state.lock();
    assert_eq!(recorded.deleted, ["5"]);
    assert_eq!(recorded.closed, ["6"]);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TodoistClient::with_base_url(TOKEN, format!("http://{addr}"));
    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
