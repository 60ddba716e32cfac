//! InfoU TUI Entry Point
//!
//! Usage:
//!   infou-tui [OPTIONS]
//!
//! Options:
//!   --api-url <URL>     Learning API base URL (env: INFOU_API_URL)
//!   --config <PATH>     Config file (default: ~/.config/infou/client.toml)
//!   --route <PATH>      Route to open, e.g. /curriculum/p1?level=beginner
//!   --headless          Load the route, print a summary and exit

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infou_core::{
    load_config_from_path, ApiClient, ConfigOverrides, Controller, InfouConfig, Route,
    SelectionStore,
};
use infou_tui::summary::summarize;
use infou_tui::App;

const DEFAULT_LOG_FILTER: &str = "infou_core=info,infou_tui=info";

#[derive(Debug, Parser)]
#[command(name = "infou-tui", version, about = "Terminal client for InfoU")]
struct Cli {
    /// Learning API base URL
    #[arg(long, env = "INFOU_API_URL")]
    api_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route to open on start
    #[arg(long, default_value = "/")]
    route: String,

    /// Load the route, print a summary and exit (no terminal needed)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.headless);

    let route = Route::parse(&cli.route)?;
    let mut config = load_config_from_path(cli.config.clone())?;
    let mut overrides = ConfigOverrides::new();
    if let Some(url) = cli.api_url.clone() {
        overrides = overrides.with_api_url(url);
    }
    if let Some(ms) = cli.timeout_ms {
        overrides = overrides.with_timeout_ms(ms);
    }
    overrides.apply(&mut config);
    tracing::info!(
        base_url = %config.api.base_url,
        source = %config.source(),
        route = %route,
        "Starting InfoU client"
    );

    if cli.headless {
        return run_headless(&config, route).await;
    }

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: infou-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Use --headless to load a route without one, e.g.");
        eprintln!("  infou-tui --headless --route '/curriculum/p1?level=beginner'");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let controller = build_controller(&config, route).await?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(controller);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn build_controller(
    config: &InfouConfig,
    route: Route,
) -> anyhow::Result<Controller<ApiClient>> {
    let client = Arc::new(ApiClient::new(&config.api).context("creating API client")?);
    if !client.health_check().await {
        tracing::warn!(base_url = %client.base_url(), "Learning API is not answering health checks");
    }
    let mut controller =
        Controller::bootstrap(client, config, SelectionStore::at_default_path()).await;
    controller.start(route);
    Ok(controller)
}

async fn run_headless(config: &InfouConfig, route: Route) -> anyhow::Result<()> {
    let mut controller = build_controller(config, route).await?;
    // Loads chain (levels, then the article, then siblings); allow a few timeouts
    let budget = Duration::from_millis(config.api.timeout_ms.saturating_mul(4));
    if tokio::time::timeout(budget, controller.settle()).await.is_err() {
        tracing::warn!(budget_ms = budget.as_millis() as u64, "Gave up waiting for the page to load");
    }
    print!(
        "{}",
        summarize(controller.route(), controller.page(), controller.store())
    );
    Ok(())
}

/// Log to a file in interactive mode so output never lands on the screen;
/// log to stderr in headless mode
fn init_logging(headless: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .init();
        return;
    }

    let Some(path) = log_file_path() else {
        return;
    };
    let file = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
    match file {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", path.display()),
    }
}

fn log_file_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("infou").join("infou-tui.log"))
}
