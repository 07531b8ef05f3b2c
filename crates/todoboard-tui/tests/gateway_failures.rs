use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockall::mock;
use serde_json::json;
use todoboard_domain::{Project, Task, TaskId};
use todoboard_gateway::{GatewayError, GatewayResult, NewTask, TaskGateway, TaskUpdate};
use todoboard_persistence::{CredentialStore, MemoryStorage, API_KEY_STORAGE_KEY};
use todoboard_tui::events::Event;
use todoboard_tui::{App, AppOptions, GatewayFactory};

mock! {
    pub Gateway {}

    #[async_trait]
    impl TaskGateway for Gateway {
        async fn list_tasks(&self) -> GatewayResult<Vec<Task>>;
        async fn list_projects(&self) -> GatewayResult<Vec<Project>>;
        async fn create_task(&self, task: NewTask) -> GatewayResult<Task>;
        async fn update_task(&self, id: TaskId, update: TaskUpdate) -> GatewayResult<Task>;
        async fn delete_task(&self, id: TaskId) -> GatewayResult<()>;
        async fn close_task(&self, id: TaskId) -> GatewayResult<()>;
    }
}

fn unavailable() -> GatewayError {
    GatewayError::Status {
        status: 503,
        message: "Service Unavailable".into(),
    }
}

async fn app_with(gateway: MockGateway) -> App {
    let gateway: Arc<dyn TaskGateway> = Arc::new(gateway);
    let factory: GatewayFactory = Arc::new(move |_key: &str| gateway.clone());
    let storage = Arc::new(MemoryStorage::with_item(API_KEY_STORAGE_KEY, json!("secret")));
    let mut app = App::new(
        CredentialStore::new(storage),
        factory,
        AppOptions::default(),
    );
    app.start().await;
    app.settle().await;
    app
}

async fn press(app: &mut App, code: KeyCode) {
    app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_close_shows_banner_and_refetch_restores_task() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_list_tasks()
        .returning(|| Ok(vec![Task::new("1", "Call plumber", "home")]));
    gateway.expect_list_projects().returning(|| Ok(vec![]));
    gateway
        .expect_close_task()
        .withf(|id| id == "1")
        .times(1)
        .returning(|_| Err(unavailable()));

    let mut app = app_with(gateway).await;

    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Char('c')).await;
    assert!(app.session().unwrap().query().task("1").is_none());

    app.settle().await;

    let banner = app.banner().expect("error banner");
    assert!(banner.message.contains("close task 1"));
    assert!(banner.message.contains("503"));

    // No rollback: the refetch after the failed write brings the task back.
    assert!(app.session().unwrap().query().task("1").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_failed_move_keeps_optimistic_labels_until_refetch() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_list_tasks()
        .returning(|| {
            Ok(vec![
                Task::new("1", "Call plumber", "home").with_labels(["KANBAN_TODO"]),
            ])
        });
    gateway.expect_list_projects().returning(|| Ok(vec![]));
    gateway
        .expect_update_task()
        .withf(|id, update| id == "1" && update.labels == Some(vec!["KANBAN_BLOCKED".into()]))
        .times(1)
        .returning(|_, _| Err(GatewayError::Transport("connection reset".into())));

    let mut app = app_with(gateway).await;

    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Char('l')).await;
    let labels = app.session().unwrap().query().task("1").unwrap().labels.clone();
    assert_eq!(labels, ["KANBAN_BLOCKED"]);

    app.settle().await;
    assert!(app.banner().is_some());
    let labels = app.session().unwrap().query().task("1").unwrap().labels.clone();
    assert_eq!(labels, ["KANBAN_TODO"]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_read_is_discarded() {
    let reads = Arc::new(AtomicUsize::new(0));
    let mut gateway = MockGateway::new();
    let counter = reads.clone();
    gateway.expect_list_tasks().returning(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Task::new("1", format!("Read {n}"), "home")])
    });
    gateway.expect_list_projects().returning(|| Ok(vec![]));

    let mut app = app_with(gateway).await;
    assert_eq!(
        app.session().unwrap().query().task("1").unwrap().content,
        "Read 0"
    );

    // Two refetches in a row: only the newer result may land.
    press(&mut app, KeyCode::Char('r')).await;
    press(&mut app, KeyCode::Char('r')).await;
    app.settle().await;

    assert_eq!(reads.load(Ordering::SeqCst), 3);
    assert_eq!(
        app.session().unwrap().query().task("1").unwrap().content,
        "Read 2"
    );
}
