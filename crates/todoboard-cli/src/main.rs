mod cli;
mod handlers;
mod output;

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use todoboard_core::AppConfig;
use todoboard_gateway::{TaskGateway, TodoistClient};
use todoboard_persistence::{CredentialStore, LocalStorage};
use todoboard_tui::{App, AppOptions, GatewayFactory, Route};
use tracing_subscriber::fmt::MakeWriter;

/// Stderr writer that goes silent while the TUI owns the terminal.
#[derive(Clone, Default)]
struct StderrOutsideTui {
    tui_active: Arc<AtomicBool>,
}

impl StderrOutsideTui {
    fn set_tui_active(&self, active: bool) {
        self.tui_active.store(active, Ordering::SeqCst);
    }

    fn is_muted(&self) -> bool {
        self.tui_active.load(Ordering::SeqCst)
    }
}

impl<'a> MakeWriter<'a> for StderrOutsideTui {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        if self.is_muted() {
            Box::new(io::sink())
        } else {
            Box::new(io::stderr())
        }
    }
}

fn init_tracing(debug_log: Option<PathBuf>, stderr: StderrOutsideTui) -> io::Result<()> {
    match debug_log {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;

            tracing_subscriber::fmt()
                .with_writer(log_file)
                .with_max_level(tracing::Level::DEBUG)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(stderr)
                .with_max_level(tracing::Level::WARN)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let stderr = StderrOutsideTui::default();
    let debug_log = std::env::var_os("TODOBOARD_DEBUG_LOG").map(PathBuf::from);
    init_tracing(debug_log, stderr.clone())?;

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "todoboard", &mut io::stdout());
        return Ok(());
    }

    let config = cli.apply_to(AppConfig::load());
    let storage_path = config
        .effective_storage_path()
        .ok_or_else(|| anyhow::anyhow!("No data directory found; pass --storage FILE"))?;
    let credentials = CredentialStore::new(Arc::new(LocalStorage::new(&storage_path)));

    match cli.command {
        Some(Commands::Key(key_cmd)) => {
            handlers::key::handle(&credentials, &storage_path, key_cmd.action).await;
        }
        Some(Commands::Completions { .. }) => {}
        None => {
            let base_url = config.effective_api_base_url().to_string();
            tracing::info!("Using task service at {}", base_url);
            let factory: GatewayFactory = Arc::new(move |token: &str| {
                let client = TodoistClient::with_base_url(token, base_url.clone());
                Arc::new(client) as Arc<dyn TaskGateway>
            });
            let options = AppOptions {
                debounce: config.effective_debounce(),
                initial_route: Route::parse(&cli.route),
                ..AppOptions::default()
            };
            let mut app = App::new(credentials, factory, options);
            stderr.set_tui_active(true);
            let result = app.run().await;
            stderr.set_tui_active(false);
            result?;
        }
    }

    Ok(())
}
