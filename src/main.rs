mod config;
mod db;
mod error;
mod format;
mod gateway;
mod models;
mod pagination;
mod seed;
mod server;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::db::{InvoiceStore, MemoryStore};
use crate::gateway::Gateway;
use crate::ui::{
    customers::{handle_key as handle_customers_key, load_customers, render_customers, CustomerAction, CustomersState},
    invoices::{handle_key as handle_invoices_key, load_invoices, render_invoices, InvoiceAction, InvoicesState},
    overview::{handle_key as handle_overview_key, load_overview, render_overview, OverviewAction, OverviewState},
};

#[derive(Parser)]
#[command(name = "invoice-dashboard", version, about = "Invoice and revenue dashboard")]
struct Cli {
    /// Use in-memory sample data instead of PostgreSQL
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API and administrative routes
    Serve,
    /// Browse the dashboard in the terminal
    Dashboard {
        /// Where to write logs while the terminal UI owns the screen
        #[arg(long, default_value = "dashboard.log")]
        log_file: PathBuf,
    },
    /// Replace the revenue table with the sample year (development only)
    Seed,
    /// Apply database migrations
    Migrate,
}

// Represents the current screen in the app
enum AppScreen {
    Overview,
    Invoices,
    Customers,
}

// Main application state
struct AppState {
    gateway: Gateway,
    screen: AppScreen,
    overview_state: Option<OverviewState>,
    invoices_state: InvoicesState,
    customers_state: CustomersState,
}

impl AppState {
    fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            screen: AppScreen::Overview,
            overview_state: None,
            invoices_state: InvoicesState::new(),
            customers_state: CustomersState::new(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;

    match cli.command {
        Command::Dashboard { log_file } => {
            init_file_logging(&log_file)?;
            let store = open_store(&config, cli.demo).await?;
            run_dashboard(Gateway::new(store)).await
        }
        Command::Serve => {
            init_logging();
            let store = open_store(&config, cli.demo).await?;
            server::serve(server::AppState::new(Gateway::new(store), config)).await
        }
        Command::Seed => {
            init_logging();
            seed::guard(&config)?;
            let store = open_store(&config, cli.demo).await?;
            let rows = seed::seed_revenue(store.as_ref()).await?;
            println!("Seeded {} revenue rows", rows);
            Ok(())
        }
        Command::Migrate => {
            init_logging();
            if cli.demo {
                bail!("migrations need a database; drop --demo");
            }
            let db = db::init(&config).await?;
            db.migrate().await?;
            tracing::info!("Migrations applied");
            Ok(())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

fn init_logging() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// The terminal UI owns stdout, so logs go to a file instead
fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

async fn open_store(config: &Config, demo: bool) -> Result<Arc<dyn InvoiceStore>> {
    if demo {
        tracing::info!("Using in-memory sample data");
        return Ok(Arc::new(MemoryStore::placeholder()));
    }

    let db = db::init(config).await?;
    Ok(Arc::new(db))
}

async fn run_dashboard(gateway: Gateway) -> Result<()> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(gateway);
    load_overview_screen(&mut app_state).await;

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("Dashboard stopped: {:#}", err);
    }

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| match app_state.screen {
            AppScreen::Overview => {
                if let Some(state) = &app_state.overview_state {
                    render_overview(f, state);
                }
            }
            AppScreen::Invoices => render_invoices(f, &mut app_state.invoices_state),
            AppScreen::Customers => render_customers(f, &mut app_state.customers_state),
        })?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key.code,
            _ => continue,
        };

        if handle_screen_key(app_state, key).await {
            break;
        }
    }

    Ok(())
}

/// Returns true when the app should quit
async fn handle_screen_key(app_state: &mut AppState, key: KeyCode) -> bool {
    match app_state.screen {
        AppScreen::Overview => match handle_overview_key(key) {
            Some(OverviewAction::Exit) => return true,
            Some(OverviewAction::Refresh) => load_overview_screen(app_state).await,
            Some(OverviewAction::ShowInvoices) => show_invoices(app_state).await,
            Some(OverviewAction::ShowCustomers) => show_customers(app_state).await,
            None => {}
        },
        AppScreen::Invoices => match handle_invoices_key(&mut app_state.invoices_state, key) {
            Some(InvoiceAction::Back) => load_overview_screen(app_state).await,
            Some(InvoiceAction::ShowCustomers) => show_customers(app_state).await,
            Some(InvoiceAction::Reload) => {
                load_invoices(&app_state.gateway, &mut app_state.invoices_state).await
            }
            None => {}
        },
        AppScreen::Customers => match handle_customers_key(&mut app_state.customers_state, key) {
            Some(CustomerAction::Back) => load_overview_screen(app_state).await,
            Some(CustomerAction::ShowInvoices) => show_invoices(app_state).await,
            Some(CustomerAction::Reload) => {
                load_customers(&app_state.gateway, &mut app_state.customers_state).await
            }
            None => {}
        },
    }

    false
}

async fn load_overview_screen(app_state: &mut AppState) {
    app_state.overview_state = Some(load_overview(&app_state.gateway).await);
    app_state.screen = AppScreen::Overview;
}

async fn show_invoices(app_state: &mut AppState) {
    load_invoices(&app_state.gateway, &mut app_state.invoices_state).await;
    app_state.screen = AppScreen::Invoices;
}

async fn show_customers(app_state: &mut AppState) {
    load_customers(&app_state.gateway, &mut app_state.customers_state).await;
    app_state.screen = AppScreen::Customers;
}
