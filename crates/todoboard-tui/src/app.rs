use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use todoboard_core::{AppConfig, Debouncer, TodoboardError, TodoboardResult};
use todoboard_domain::TaskId;
use todoboard_gateway::{NewTask, TaskGateway, TaskUpdate};
use todoboard_persistence::CredentialStore;
use tokio::sync::mpsc;

use crate::board::{BoardProjection, BoardView, Filters, MoveDirection};
use crate::command::{Command, CommandInterpreter};
use crate::components::Banner;
use crate::events::{Event, EventHandler};
use crate::filter_dialog::{FilterDialog, FilterOutcome};
use crate::gate::{CredentialGate, GateAction};
use crate::keybindings::BindingScope;
use crate::prompt::{Prompt, PromptKind, PromptOutcome};
use crate::query::{QueryClient, QueryKey, QueryMessage};
use crate::router::{Route, RouteError, Router};
use crate::scroll::ScrollState;
use crate::ui;

/// Builds the gateway for a stored API key.
pub type GatewayFactory = Arc<dyn Fn(&str) -> Arc<dyn TaskGateway> + Send + Sync>;

/// Opens a task URL outside the terminal.
pub type UrlOpener = Arc<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

const WHEEL_ROWS: isize = 3;
const SETTLE_GRACE: Duration = Duration::from_millis(50);

pub struct AppOptions {
    pub debounce: Duration,
    pub initial_route: Route,
    pub opener: UrlOpener,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            debounce: AppConfig::default().effective_debounce(),
            initial_route: Route::Root,
            opener: Arc::new(|url: &str| open::that_detached(url)),
        }
    }
}

pub enum Screen {
    /// No usable API key yet.
    Gate(CredentialGate),
    Board(Box<Session>),
}

#[derive(Debug)]
pub enum Mode {
    Normal,
    Prompt(Prompt),
    Filter(FilterDialog),
    Help,
}

/// Side effects a key press asks of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    None,
    Quit,
    OpenUrl(String),
}

/// Everything that lives while an API key is loaded.
pub struct Session {
    pub(crate) query: QueryClient,
    pub(crate) query_rx: mpsc::UnboundedReceiver<QueryMessage>,
    pub(crate) debouncer: Debouncer<TaskId>,
    pub(crate) router: Router,
    pub(crate) view: BoardView,
    /// Interpreter for the non-kanban routes.
    pub(crate) list_interpreter: CommandInterpreter,
    pub(crate) list_scroll: ScrollState,
    pub(crate) list_selected: Option<TaskId>,
    pub(crate) filters: Filters,
    pub(crate) mode: Mode,
}

/// The projection for the current route. Only the task cache stays borrowed.
pub(crate) fn project<'a>(
    query: &'a QueryClient,
    view: &BoardView,
    filters: &Filters,
    today: NaiveDate,
) -> BoardProjection<'a> {
    BoardProjection::build(
        query.tasks(),
        query.projects(),
        view.parent_id(),
        filters,
        view.search().query(),
        today,
    )
}

impl Session {
    fn open(gateway: Arc<dyn TaskGateway>, options: &AppOptions) -> Self {
        let (mut query, query_rx) = QueryClient::new(gateway);
        query.fetch(QueryKey::Tasks);
        query.fetch(QueryKey::Projects);
        let router = Router::new(options.initial_route.clone());
        let view = BoardView::new(router.current().parent_id().map(str::to_string));
        Self {
            query,
            query_rx,
            debouncer: Debouncer::new(options.debounce),
            router,
            view,
            list_interpreter: CommandInterpreter::new(),
            list_scroll: ScrollState::default(),
            list_selected: None,
            filters: Filters::default(),
            mode: Mode::Normal,
        }
    }

    pub fn query(&self) -> &QueryClient {
        &self.query
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Selected row of the task list.
    pub fn list_selection(&self) -> Option<&str> {
        self.list_selected.as_deref()
    }

    pub fn pending_moves(&self) -> usize {
        self.debouncer.pending_count()
    }

    /// The error to show for the current route, if any. A detail route whose
    /// task is absent from a loaded cache counts as not found.
    pub fn route_error(&self) -> Option<RouteError> {
        match self.router.current() {
            Route::Error(err) => Some(err.clone()),
            Route::Detail(id) if self.query.tasks_state().data().is_some() => {
                match self.query.task(id) {
                    Some(_) => None,
                    None => Some(RouteError::from(&TodoboardError::NotFound(format!(
                        "task {id}"
                    )))),
                }
            }
            _ => None,
        }
    }

    pub fn binding_scope(&self) -> BindingScope {
        match &self.mode {
            Mode::Prompt(prompt) => BindingScope::Prompt(prompt.kind()),
            Mode::Filter(_) => BindingScope::Filter,
            Mode::Help => BindingScope::Help,
            Mode::Normal => self.view_scope(),
        }
    }

    /// Bindings of the page under any popup.
    pub fn view_scope(&self) -> BindingScope {
        if self.route_error().is_some() {
            BindingScope::Error
        } else if self.router.current().is_kanban() {
            BindingScope::Kanban
        } else {
            BindingScope::TaskList
        }
    }

    /// First key of an unfinished `g` chord.
    pub fn pending_chord(&self) -> Option<char> {
        let pending = if self.on_kanban() {
            self.view.interpreter().pending()
        } else {
            self.list_interpreter.pending()
        };
        match pending {
            Some(KeyCode::Char('g')) => Some('g'),
            _ => None,
        }
    }

    fn on_kanban(&self) -> bool {
        self.router.current().is_kanban() && self.route_error().is_none()
    }

    fn reconcile(&mut self, today: NaiveDate) {
        let projection = project(&self.query, &self.view, &self.filters, today);
        self.view.reconcile(&projection);
        let listed = self
            .list_selected
            .as_deref()
            .is_some_and(|id| projection.visible.iter().any(|t| t.id == id));
        if !listed {
            self.list_selected = None;
        }
    }

    fn on_task_list(&self) -> bool {
        matches!(self.router.current(), Route::TaskList)
    }

    fn navigate(&mut self, route: Route) {
        if self.router.navigate(route) {
            self.reset_view();
        }
    }

    /// Each route starts from a clean board; filters carry over.
    fn reset_view(&mut self) {
        let parent = self.router.current().parent_id().map(str::to_string);
        self.view = BoardView::new(parent);
        self.list_interpreter.reset();
        self.list_scroll = ScrollState::default();
        self.list_selected = None;
        self.mode = Mode::Normal;
    }

    fn handle_query_message(&mut self, message: QueryMessage, today: NaiveDate) -> Option<Banner> {
        self.query.apply(message);
        let banner = self.query.take_mutation_error().map(Banner::error);
        self.reconcile(today);
        banner
    }

    fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) -> Effect {
        match &mut self.mode {
            Mode::Prompt(prompt) => {
                let kind = prompt.kind();
                match prompt.handle_key(key) {
                    PromptOutcome::Pending => {}
                    PromptOutcome::Submitted(text) => {
                        self.mode = Mode::Normal;
                        self.submit_prompt(kind, Some(text), today);
                    }
                    PromptOutcome::Cancelled => {
                        self.mode = Mode::Normal;
                        self.submit_prompt(kind, None, today);
                    }
                }
                Effect::None
            }
            Mode::Filter(dialog) => {
                match dialog.handle_key(key, &mut self.filters, self.query.projects()) {
                    FilterOutcome::Open => {}
                    FilterOutcome::Changed => self.reconcile(today),
                    FilterOutcome::Closed => self.mode = Mode::Normal,
                }
                Effect::None
            }
            Mode::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
                ) {
                    self.mode = Mode::Normal;
                }
                Effect::None
            }
            Mode::Normal => {
                let command = if self.on_kanban() {
                    self.view.interpreter_mut().interpret(key)
                } else {
                    self.list_interpreter.interpret(key)
                };
                match command {
                    Some(command) => self.execute(command, today),
                    None => Effect::None,
                }
            }
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, text: Option<String>, today: NaiveDate) {
        match kind {
            PromptKind::Search => {
                let query = text.filter(|t| !t.is_empty());
                tracing::debug!("Search for {:?}", query);
                self.view.begin_search(query);
                self.reconcile(today);
            }
            PromptKind::NewTask => {
                let parent = self.view.parent_id().map(str::to_string);
                match text.as_deref().and_then(|t| NewTask::parse(t, parent)) {
                    Some(task) => self.query.create_task(task),
                    None => tracing::debug!("New task prompt gave no content"),
                }
            }
        }
    }

    fn execute(&mut self, command: Command, today: NaiveDate) -> Effect {
        let kanban = self.on_kanban();
        match command {
            Command::Quit => return Effect::Quit,
            Command::Help => self.mode = Mode::Help,
            Command::Refetch => {
                self.query.invalidate(QueryKey::Tasks);
                self.query.invalidate(QueryKey::Projects);
            }
            Command::HistoryBack => {
                if self.router.back() {
                    self.reset_view();
                }
            }
            Command::HistoryForward => {
                if self.router.forward() {
                    self.reset_view();
                }
            }
            Command::GoRoot => self.navigate(Route::Root),
            Command::GoTaskList => self.navigate(Route::TaskList),
            Command::Filter if self.route_error().is_none() => {
                self.mode = Mode::Filter(FilterDialog::new());
            }
            Command::ScrollTop
            | Command::ScrollBottom
            | Command::PageDown
            | Command::PageUp
            | Command::HalfPageDown
            | Command::HalfPageUp => self.scroll(command, kanban, today),
            Command::SelectNext | Command::SelectPrev if self.on_task_list() => {
                self.select_list_row(command == Command::SelectNext, today);
            }
            Command::FollowLink | Command::OpenDetail if self.on_task_list() => {
                self.open_list_row(command == Command::FollowLink, today);
            }
            Command::Escape if self.on_task_list() => self.list_selected = None,
            _ if !kanban => {}
            Command::MoveLeft => self.move_selected(MoveDirection::Left, today),
            Command::MoveRight => self.move_selected(MoveDirection::Right, today),
            Command::Search => self.mode = Mode::Prompt(Prompt::new(PromptKind::Search)),
            Command::CreateTask => self.mode = Mode::Prompt(Prompt::new(PromptKind::NewTask)),
            Command::Escape => self.view.escape(),
            Command::DeleteTask => {
                if let Some(id) = self.view.selected_task_id().map(str::to_string) {
                    self.debouncer.cancel(&id);
                    self.query.delete_task(id);
                    self.view.clear_selection();
                    self.reconcile(today);
                }
            }
            Command::CloseTask => {
                if let Some(id) = self.view.selected_task_id().map(str::to_string) {
                    self.debouncer.cancel(&id);
                    self.query.close_task(id);
                    self.view.clear_selection();
                    self.reconcile(today);
                }
            }
            Command::NextMatch | Command::PrevMatch => {
                let count = project(&self.query, &self.view, &self.filters, today)
                    .matches
                    .len();
                if command == Command::NextMatch {
                    self.view.next_match(count);
                } else {
                    self.view.prev_match(count);
                }
                self.reconcile(today);
            }
            Command::SelectNext | Command::SelectPrev => {
                let projection = project(&self.query, &self.view, &self.filters, today);
                self.view
                    .select_relative(&projection, command == Command::SelectNext);
            }
            Command::OpenDetail => {
                if let Some(id) = self.view.selected_task_id().map(str::to_string) {
                    self.navigate(Route::Detail(id));
                }
            }
            Command::FollowLink => {
                let target = self
                    .view
                    .selected_task_id()
                    .filter(|id| {
                        project(&self.query, &self.view, &self.filters, today).has_subtasks(id)
                    })
                    .map(str::to_string);
                if let Some(id) = target {
                    self.navigate(Route::Detail(id));
                }
            }
            Command::OpenUrl => {
                let url = self
                    .view
                    .selected_task_id()
                    .and_then(|id| self.query.task(id))
                    .map(|task| task.url.clone())
                    .filter(|url| !url.is_empty());
                if let Some(url) = url {
                    return Effect::OpenUrl(url);
                }
            }
            Command::Filter => {}
        }
        Effect::None
    }

    fn scroll(&mut self, command: Command, kanban: bool, today: NaiveDate) {
        if kanban {
            match command {
                Command::ScrollTop => self.view.scroll_to_top(),
                Command::ScrollBottom => self.view.scroll_to_bottom(),
                Command::PageDown => self.view.page_down(),
                Command::PageUp => self.view.page_up(),
                Command::HalfPageDown => self.view.half_page_down(),
                Command::HalfPageUp => self.view.half_page_up(),
                _ => {}
            }
            return;
        }
        let rows = self.list_len(today);
        match command {
            Command::ScrollTop => self.list_scroll.to_top(),
            Command::ScrollBottom => self.list_scroll.to_bottom(rows),
            Command::PageDown => self.list_scroll.page_down(rows),
            Command::PageUp => self.list_scroll.page_up(),
            Command::HalfPageDown => self.list_scroll.half_page_down(rows),
            Command::HalfPageUp => self.list_scroll.half_page_up(),
            _ => {}
        }
    }

    fn select_list_row(&mut self, forward: bool, today: NaiveDate) {
        let projection = project(&self.query, &self.view, &self.filters, today);
        let len = projection.visible.len();
        if len == 0 {
            return;
        }
        let current = self
            .list_selected
            .as_deref()
            .and_then(|id| projection.visible.iter().position(|t| t.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.list_selected = Some(projection.visible[next].id.clone());
        self.list_scroll.reveal_row(next);
    }

    /// Enter only follows rows that link to subtasks; `g d` opens any row.
    fn open_list_row(&mut self, links_only: bool, today: NaiveDate) {
        let projection = project(&self.query, &self.view, &self.filters, today);
        let target = self
            .list_selected
            .as_deref()
            .filter(|id| !links_only || projection.has_subtasks(id))
            .map(str::to_string);
        if let Some(id) = target {
            self.navigate(Route::Detail(id));
        }
    }

    fn list_len(&self, today: NaiveDate) -> usize {
        project(&self.query, &self.view, &self.filters, today)
            .visible
            .len()
    }

    /// Optimistically relabel the selected card and schedule the remote
    /// update. Only the last move inside the quiet period reaches the service.
    fn move_selected(&mut self, direction: MoveDirection, today: NaiveDate) {
        let planned = self.view.plan_move(
            &project(&self.query, &self.view, &self.filters, today),
            direction,
        );
        let Some(planned) = planned else {
            return;
        };
        tracing::debug!(
            "Moving task {} from {} to {}",
            planned.task_id,
            planned.from.title(),
            planned.to.title()
        );

        let update = TaskUpdate::labels(planned.labels);
        let request = self.query.stage_update(planned.task_id.clone(), update);
        self.debouncer.call(planned.task_id.clone(), request);

        let projection = project(&self.query, &self.view, &self.filters, today);
        self.view.follow_match(&planned.task_id, &projection);
        self.view.reconcile(&projection);
        self.view.reveal(&planned.task_id);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, today: NaiveDate) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        let kanban = self.on_kanban();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if kanban => {
                let hit = self
                    .view
                    .registry()
                    .hit(mouse.column, mouse.row)
                    .cloned();
                if let Some(id) = hit {
                    self.view.click(id);
                    self.reconcile(today);
                }
            }
            MouseEventKind::ScrollDown if kanban => self.view.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp if kanban => self.view.scroll_by(-WHEEL_ROWS),
            MouseEventKind::ScrollDown => {
                let rows = self.list_len(today);
                self.list_scroll.down(WHEEL_ROWS.unsigned_abs(), rows);
            }
            MouseEventKind::ScrollUp => self.list_scroll.up(WHEEL_ROWS.unsigned_abs()),
            _ => {}
        }
    }
}

pub struct App {
    pub should_quit: bool,
    credentials: CredentialStore,
    factory: GatewayFactory,
    options: AppOptions,
    screen: Screen,
    banner: Option<Banner>,
    today_override: Option<NaiveDate>,
}

impl App {
    pub fn new(credentials: CredentialStore, factory: GatewayFactory, options: AppOptions) -> Self {
        Self {
            should_quit: false,
            credentials,
            factory,
            options,
            screen: Screen::Gate(CredentialGate::new()),
            banner: None,
            today_override: None,
        }
    }

    /// Pin the date used by the due filters and highlighting.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Board(session) => Some(&**session),
            Screen::Gate(_) => None,
        }
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Screen, Option<&Banner>) {
        (&mut self.screen, self.banner.as_ref())
    }

    pub fn binding_scope(&self) -> BindingScope {
        match &self.screen {
            Screen::Gate(_) => BindingScope::Gate,
            Screen::Board(session) => session.binding_scope(),
        }
    }

    /// Load the stored key and open the board, or show the key form.
    pub async fn start(&mut self) {
        match self.credentials.load().await {
            Some(key) => {
                tracing::info!("Opening board with stored API key");
                let gateway = (self.factory)(&key);
                self.screen = Screen::Board(Box::new(Session::open(gateway, &self.options)));
            }
            None => {
                tracing::info!("No API key stored, showing key form");
                self.screen = Screen::Gate(CredentialGate::new());
            }
        }
    }

    pub async fn handle_event(&mut self, event: Event) {
        let today = self.today();
        match event {
            Event::Key(key) => self.handle_key(key, today).await,
            Event::Mouse(mouse) => {
                if let Screen::Board(session) = &mut self.screen {
                    session.handle_mouse(mouse, today);
                }
            }
            Event::Resize => {}
            Event::Tick => {
                if self
                    .banner
                    .as_ref()
                    .is_some_and(|b| b.is_expired(Banner::TTL))
                {
                    self.banner = None;
                }
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) {
        let effect = match &mut self.screen {
            Screen::Gate(gate) => match gate.handle_key(key) {
                GateAction::None => Effect::None,
                GateAction::Quit => Effect::Quit,
                GateAction::Submit(api_key) => {
                    self.submit_key(&api_key).await;
                    Effect::None
                }
            },
            Screen::Board(session) => session.handle_key(key, today),
        };

        match effect {
            Effect::None => {}
            Effect::Quit => self.should_quit = true,
            Effect::OpenUrl(url) => {
                tracing::debug!("Opening {}", url);
                if let Err(e) = (self.options.opener)(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                    self.banner = Some(Banner::error(format!("Failed to open {url}: {e}")));
                }
            }
        }
    }

    async fn submit_key(&mut self, api_key: &str) {
        match self.credentials.save(api_key).await {
            Ok(()) => self.start().await,
            Err(e) => {
                tracing::warn!("Failed to store API key: {}", e);
                if let Screen::Gate(gate) = &mut self.screen {
                    gate.set_error(e.to_string());
                }
            }
        }
    }

    pub fn handle_query_message(&mut self, message: QueryMessage) {
        let today = self.today();
        if let Screen::Board(session) = &mut self.screen {
            if let Some(banner) = session.handle_query_message(message, today) {
                self.banner = Some(banner);
            }
        }
    }

    /// Apply results that are already on their way, leaving pending moves
    /// in their quiet period.
    pub async fn drain(&mut self) {
        loop {
            let Screen::Board(session) = &mut self.screen else {
                return;
            };
            let received = tokio::time::timeout(SETTLE_GRACE, session.query_rx.recv()).await;
            match received {
                Ok(Some(message)) => self.handle_query_message(message),
                _ => break,
            }
        }
    }

    /// Flush pending moves and apply every result that arrives until the
    /// session goes quiet.
    pub async fn settle(&mut self) {
        let today = self.today();
        let Screen::Board(session) = &mut self.screen else {
            return;
        };
        loop {
            session.debouncer.settle().await;
            match tokio::time::timeout(SETTLE_GRACE, session.query_rx.recv()).await {
                Ok(Some(message)) => {
                    if let Some(banner) = session.handle_query_message(message, today) {
                        self.banner = Some(banner);
                    }
                }
                _ => break,
            }
        }
    }

    pub async fn run(&mut self) -> TodoboardResult<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;

        if let Screen::Board(session) = &mut self.screen {
            if session.pending_moves() > 0 {
                tracing::info!("Sending {} pending moves", session.pending_moves());
            }
            session.debouncer.settle().await;
        }

        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> TodoboardResult<()> {
        let mut events = EventHandler::new();
        self.start().await;

        while !self.should_quit {
            terminal.draw(|frame| ui::render(self, frame))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
                Some(message) = next_message(&mut self.screen) => {
                    self.handle_query_message(message);
                }
            }
        }

        events.stop();
        Ok(())
    }
}

async fn next_message(screen: &mut Screen) -> Option<QueryMessage> {
    match screen {
        Screen::Board(session) => session.query_rx.recv().await,
        Screen::Gate(_) => std::future::pending().await,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
