use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use todoboard_domain::{Project, Task, TaskId};
use todoboard_gateway::{GatewayResult, NewTask, TaskGateway, TaskUpdate};
use tokio::sync::mpsc;

use super::state::{QueryKey, QueryState};

/// A write sent to the task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(String),
    Update(TaskId),
    Delete(TaskId),
    Close(TaskId),
}

impl Mutation {
    pub fn describe(&self) -> String {
        match self {
            Mutation::Create(content) => format!("create \"{content}\""),
            Mutation::Update(id) => format!("update task {id}"),
            Mutation::Delete(id) => format!("delete task {id}"),
            Mutation::Close(id) => format!("close task {id}"),
        }
    }
}

/// Completion of a spawned gateway call, delivered to the event loop.
#[derive(Debug)]
pub enum QueryMessage {
    Tasks {
        generation: u64,
        result: GatewayResult<Vec<Task>>,
    },
    Projects {
        generation: u64,
        result: GatewayResult<Vec<Project>>,
    },
    Mutated {
        mutation: Mutation,
        /// Set for staged updates; matches [`QueryClient::stage_update`].
        ticket: Option<u64>,
        result: GatewayResult<()>,
    },
}

/// A label change applied locally whose request has not come back yet.
#[derive(Debug, Clone)]
struct PendingUpdate {
    ticket: u64,
    update: TaskUpdate,
}

/// Client-side cache of the remote task and project lists.
///
/// Gateway calls run as spawned tasks; their results only touch the cache
/// when the owner passes them back through [`QueryClient::apply`].
///
/// Staged updates stay layered over every task list the server returns
/// until the request carrying the latest of them finishes.
pub struct QueryClient {
    gateway: Arc<dyn TaskGateway>,
    tx: mpsc::UnboundedSender<QueryMessage>,
    tasks: QueryState<Vec<Task>>,
    projects: QueryState<Vec<Project>>,
    pending: HashMap<TaskId, PendingUpdate>,
    next_ticket: u64,
    last_mutation_error: Option<String>,
}

impl QueryClient {
    pub fn new(gateway: Arc<dyn TaskGateway>) -> (Self, mpsc::UnboundedReceiver<QueryMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            gateway,
            tx,
            tasks: QueryState::default(),
            projects: QueryState::default(),
            pending: HashMap::new(),
            next_ticket: 0,
            last_mutation_error: None,
        };
        (client, rx)
    }

    pub fn tasks_state(&self) -> &QueryState<Vec<Task>> {
        &self.tasks
    }

    pub fn projects_state(&self) -> &QueryState<Vec<Project>> {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks().iter().find(|t| t.id == id)
    }

    pub fn is_fetching(&self) -> bool {
        self.tasks.is_loading() || self.projects.is_loading()
    }

    /// Whether a staged update for `id` has not been confirmed yet.
    pub fn has_pending_update(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn last_mutation_error(&self) -> Option<&str> {
        self.last_mutation_error.as_deref()
    }

    pub fn take_mutation_error(&mut self) -> Option<String> {
        self.last_mutation_error.take()
    }

    /// Start a read. Must be called inside a tokio runtime.
    pub fn fetch(&mut self, key: QueryKey) {
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        match key {
            QueryKey::Tasks => {
                let generation = self.tasks.begin_fetch();
                tokio::spawn(async move {
                    let result = gateway.list_tasks().await;
                    let _ = tx.send(QueryMessage::Tasks { generation, result });
                });
            }
            QueryKey::Projects => {
                let generation = self.projects.begin_fetch();
                tokio::spawn(async move {
                    let result = gateway.list_projects().await;
                    let _ = tx.send(QueryMessage::Projects { generation, result });
                });
            }
        }
        tracing::debug!("Fetching {}", key.name());
    }

    /// Mark a resource stale and refetch it. Any read already in flight for
    /// it is superseded.
    pub fn invalidate(&mut self, key: QueryKey) {
        match key {
            QueryKey::Tasks => self.tasks.mark_stale(),
            QueryKey::Projects => self.projects.mark_stale(),
        }
        self.fetch(key);
    }

    /// Optimistically rewrite the cached task list.
    pub fn set_tasks_data(&mut self, f: impl FnOnce(&mut Vec<Task>)) -> bool {
        self.tasks.update_data(f)
    }

    /// Apply `update` to the cached copy of a task without contacting the
    /// service.
    pub fn patch_task(&mut self, id: &str, update: &TaskUpdate) -> bool {
        let mut found = false;
        self.set_tasks_data(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                update.apply_to(task);
                found = true;
            }
        });
        found
    }

    /// Patch the cached task and return the request that sends `update`.
    ///
    /// The patch survives refetches until the returned request, or a later
    /// staged update for the same task, completes. The caller decides when
    /// the request runs.
    pub fn stage_update(
        &mut self,
        id: TaskId,
        update: TaskUpdate,
    ) -> impl Future<Output = ()> + Send + 'static {
        self.patch_task(&id, &update);
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(
            id.clone(),
            PendingUpdate {
                ticket,
                update: update.clone(),
            },
        );

        let gateway = self.gateway.clone();
        let mutation = Mutation::Update(id.clone());
        self.mutation_request(mutation, Some(ticket), async move {
            gateway.update_task(id, update).await.map(|_| ())
        })
    }

    pub fn create_task(&mut self, task: NewTask) {
        let gateway = self.gateway.clone();
        let mutation = Mutation::Create(task.content.clone());
        tokio::spawn(self.mutation_request(mutation, None, async move {
            gateway.create_task(task).await.map(|_| ())
        }));
    }

    pub fn update_task(&mut self, id: TaskId, update: TaskUpdate) {
        let request = self.stage_update(id, update);
        tokio::spawn(request);
    }

    pub fn delete_task(&mut self, id: TaskId) {
        self.remove_locally(&id);
        let gateway = self.gateway.clone();
        let mutation = Mutation::Delete(id.clone());
        tokio::spawn(self.mutation_request(mutation, None, async move {
            gateway.delete_task(id).await
        }));
    }

    pub fn close_task(&mut self, id: TaskId) {
        self.remove_locally(&id);
        let gateway = self.gateway.clone();
        let mutation = Mutation::Close(id.clone());
        tokio::spawn(self.mutation_request(mutation, None, async move {
            gateway.close_task(id).await
        }));
    }

    /// Feed a completed call back into the cache. Returns whether cached
    /// data changed.
    ///
    /// Every finished mutation invalidates the task list, whether it
    /// succeeded or not; failures are not rolled back.
    pub fn apply(&mut self, message: QueryMessage) -> bool {
        match message {
            QueryMessage::Tasks { generation, result } => {
                let applied = self.tasks.resolve(generation, result);
                if applied {
                    self.reapply_pending();
                } else {
                    tracing::debug!("Discarded superseded tasks result (gen {})", generation);
                }
                applied
            }
            QueryMessage::Projects { generation, result } => {
                let applied = self.projects.resolve(generation, result);
                if !applied {
                    tracing::debug!("Discarded superseded projects result (gen {})", generation);
                }
                applied
            }
            QueryMessage::Mutated {
                mutation,
                ticket,
                result,
            } => {
                if let (Mutation::Update(id), Some(ticket)) = (&mutation, ticket) {
                    if self.pending.get(id).is_some_and(|p| p.ticket == ticket) {
                        self.pending.remove(id);
                    }
                }
                match result {
                    Ok(()) => tracing::debug!("Finished {}", mutation.describe()),
                    Err(e) => {
                        tracing::warn!("Failed to {}: {}", mutation.describe(), e);
                        self.last_mutation_error =
                            Some(format!("Failed to {}: {}", mutation.describe(), e));
                    }
                }
                self.invalidate(QueryKey::Tasks);
                false
            }
        }
    }

    fn remove_locally(&mut self, id: &str) {
        self.pending.remove(id);
        self.set_tasks_data(|tasks| tasks.retain(|t| t.id != id));
    }

    fn reapply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let Some(tasks) = self.tasks.data_mut() else {
            return;
        };
        for task in tasks.iter_mut() {
            if let Some(pending) = self.pending.get(&task.id) {
                pending.update.apply_to(task);
            }
        }
    }

    fn mutation_request(
        &self,
        mutation: Mutation,
        ticket: Option<u64>,
        call: impl Future<Output = GatewayResult<()>> + Send + 'static,
    ) -> impl Future<Output = ()> + Send + 'static {
        let tx = self.tx.clone();
        async move {
            let result = call.await;
            let _ = tx.send(QueryMessage::Mutated {
                mutation,
                ticket,
                result,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryStatus;
    use todoboard_gateway::{GatewayCall, InMemoryGateway};

    fn gateway() -> Arc<InMemoryGateway> {
        Arc::new(InMemoryGateway::with_data(
            vec![
                Task::new("1", "Alpha", "p").with_labels(["KANBAN_TODO"]),
                Task::new("2", "Beta", "p"),
            ],
            vec![Project::new("p", "Inbox")],
        ))
    }

    async fn loaded(
        gw: Arc<InMemoryGateway>,
    ) -> (QueryClient, mpsc::UnboundedReceiver<QueryMessage>) {
        let (mut client, mut rx) = QueryClient::new(gw);
        client.fetch(QueryKey::Tasks);
        client.fetch(QueryKey::Projects);
        for _ in 0..2 {
            let msg = rx.recv().await.unwrap();
            assert!(client.apply(msg));
        }
        (client, rx)
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let (client, _rx) = loaded(gateway()).await;
        assert_eq!(client.tasks().len(), 2);
        assert_eq!(client.projects()[0].name, "Inbox");
        assert_eq!(client.tasks_state().status(), &QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_stale_read_is_discarded() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;

        client.fetch(QueryKey::Tasks);
        let stale = rx.recv().await.unwrap();
        client.invalidate(QueryKey::Tasks);
        let fresh = rx.recv().await.unwrap();

        assert!(!client.apply(stale));
        assert!(client.apply(fresh));
    }

    #[tokio::test]
    async fn test_delete_is_optimistic_and_invalidates() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;

        client.delete_task("1".into());
        assert!(client.task("1").is_none());

        let done = rx.recv().await.unwrap();
        assert!(matches!(done, QueryMessage::Mutated { .. }));
        client.apply(done);
        assert!(client.tasks_state().is_loading());

        let refetch = rx.recv().await.unwrap();
        assert!(client.apply(refetch));
        assert_eq!(client.tasks().len(), 1);
        assert!(gw.calls().contains(&GatewayCall::Delete("1".into())));
    }

    #[tokio::test]
    async fn test_failed_update_is_not_rolled_back() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;
        gw.fail_writes(Some("read only"));

        client.update_task("2".into(), TaskUpdate::labels(vec!["KANBAN_DONE".into()]));
        assert_eq!(client.task("2").unwrap().labels, ["KANBAN_DONE"]);

        let done = rx.recv().await.unwrap();
        client.apply(done);
        assert_eq!(client.task("2").unwrap().labels, ["KANBAN_DONE"]);
        assert!(client.last_mutation_error().unwrap().contains("read only"));

        // The follow-up read restores the server's view.
        let refetch = rx.recv().await.unwrap();
        client.apply(refetch);
        assert!(client.task("2").unwrap().labels.is_empty());
        assert!(client.take_mutation_error().is_some());
        assert!(client.last_mutation_error().is_none());
    }

    #[tokio::test]
    async fn test_staged_update_survives_refetch_until_sent() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;

        let todo = TaskUpdate::labels(vec!["KANBAN_TODO".into()]);
        let request = client.stage_update("2".into(), todo);
        client.invalidate(QueryKey::Tasks);
        let refetch = rx.recv().await.unwrap();
        assert!(client.apply(refetch));
        assert_eq!(client.task("2").unwrap().labels, ["KANBAN_TODO"]);
        assert!(client.has_pending_update("2"));

        request.await;
        let done = rx.recv().await.unwrap();
        client.apply(done);
        assert!(!client.has_pending_update("2"));
        let refetch = rx.recv().await.unwrap();
        client.apply(refetch);
        assert_eq!(client.task("2").unwrap().labels, ["KANBAN_TODO"]);
    }

    #[tokio::test]
    async fn test_older_request_keeps_newer_staged_update() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;

        let first = client.stage_update("2".into(), TaskUpdate::labels(vec!["KANBAN_TODO".into()]));
        first.await;
        let _second =
            client.stage_update("2".into(), TaskUpdate::labels(vec!["KANBAN_BLOCKED".into()]));

        let done = rx.recv().await.unwrap();
        client.apply(done);
        assert!(client.has_pending_update("2"));

        let refetch = rx.recv().await.unwrap();
        client.apply(refetch);
        assert_eq!(client.task("2").unwrap().labels, ["KANBAN_BLOCKED"]);
    }

    #[tokio::test]
    async fn test_delete_drops_staged_update() {
        let gw = gateway();
        let (mut client, _rx) = loaded(gw.clone()).await;

        let done = TaskUpdate::labels(vec!["KANBAN_DONE".into()]);
        let _request = client.stage_update("2".into(), done);
        client.delete_task("2".into());
        assert!(!client.has_pending_update("2"));
    }

    #[tokio::test]
    async fn test_create_waits_for_server() {
        let gw = gateway();
        let (mut client, mut rx) = loaded(gw.clone()).await;

        client.create_task(NewTask::new("Gamma"));
        assert_eq!(client.tasks().len(), 2);

        let done = rx.recv().await.unwrap();
        client.apply(done);
        let refetch = rx.recv().await.unwrap();
        client.apply(refetch);
        assert!(client.tasks().iter().any(|t| t.content == "Gamma"));
    }

    #[tokio::test]
    async fn test_read_failure_sets_error_status() {
        let gw = gateway();
        gw.fail_reads(Some("down"));
        let (mut client, mut rx) = QueryClient::new(gw);
        client.fetch(QueryKey::Tasks);
        let msg = rx.recv().await.unwrap();
        client.apply(msg);
        assert!(client.tasks_state().error().unwrap().contains("down"));
        assert!(client.tasks().is_empty());
    }
}
