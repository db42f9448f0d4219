use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_planner::app::{App, Effect, Event};
use course_planner::catalog::CatalogState;
use course_planner::config::Config;
use course_planner::filter::Filter;
use course_planner::render::text;
use course_planner::schedule::Toggled;
use course_planner::storage::{KeyValueStore, SqliteStore};
use course_planner::{api, render};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Browse a course catalog and build a personal schedule")]
struct Cli {
    /// Catalog file or http(s) URL
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Schedule database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog page
    Serve {
        /// Port for HTTP server
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List catalog courses
    Courses {
        /// Only show this department ("all" for every department)
        #[arg(short, long, default_value = "all")]
        department: String,
    },
    /// List departments
    Departments,
    /// Inspect or edit the saved schedule
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// Show scheduled courses and totals
    List,
    /// Add a course by id
    Add { id: String },
    /// Remove a course by id
    Remove { id: String },
    /// Add the course if absent, remove it if present
    Toggle { id: String },
    /// Remove every course
    Clear {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
}

/// Initialize tracing with output to stderr (for CLI output) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "course_planner=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // keep stdout for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::open(config.database_path()?).context("Failed to open schedule database")?;
    store.migrate().context("Failed to migrate schedule database")?;
    Ok(store)
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting course planner on port {}", port);

    let store: Arc<dyn KeyValueStore> = Arc::new(open_store(config)?);
    let state = api::shared(App::new(store));
    let router = api::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Course planner listening on http://127.0.0.1:{}", port);

    api::spawn_catalog_load(state, config.catalog_source());

    axum::serve(listener, router).await?;
    Ok(())
}

/// Loads the catalog, turning a failure into a command error.
async fn app_with_catalog(config: &Config) -> anyhow::Result<App<SqliteStore>> {
    let mut app = App::new(open_store(config)?);
    if let CatalogState::Failed(message) = app.load_catalog(&config.catalog_source()).await {
        anyhow::bail!("{}: {}", render::html::LOAD_ERROR_MESSAGE, message);
    }
    Ok(app)
}

fn print_schedule(app: &App<SqliteStore>) {
    let schedule = app.schedule();
    print!(
        "{}",
        text::render_schedule(schedule.courses(), schedule.total_credits())
    );
}

async fn run_schedule(config: &Config, action: ScheduleAction) -> anyhow::Result<()> {
    match action {
        ScheduleAction::List => {
            let app = App::new(open_store(config)?);
            print_schedule(&app);
        }
        ScheduleAction::Add { id } => {
            let mut app = app_with_catalog(config).await?;
            match app.dispatch(Event::AddCourse(id.clone()))? {
                Effect::NotInCatalog => anyhow::bail!("Course not found: {}", id),
                Effect::Added { changed: false } => println!("{} is already scheduled", id),
                _ => println!("Added {}", id),
            }
            print_schedule(&app);
        }
        ScheduleAction::Remove { id } => {
            let mut app = App::new(open_store(config)?);
            match app.dispatch(Event::RemoveCourse(id.clone()))? {
                Effect::Removed { changed: true } => println!("Removed {}", id),
                _ => println!("{} is not scheduled", id),
            }
            print_schedule(&app);
        }
        ScheduleAction::Toggle { id } => {
            let mut app = app_with_catalog(config).await?;
            match app.dispatch(Event::ToggleCourse(id.clone()))? {
                Effect::Toggled(Toggled::Added) => println!("Added {}", id),
                Effect::Toggled(Toggled::Removed) => println!("Removed {}", id),
                _ => anyhow::bail!("Course not found: {}", id),
            }
            print_schedule(&app);
        }
        ScheduleAction::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear the schedule without --yes");
            }
            let mut app = App::new(open_store(config)?);
            app.dispatch(Event::ClearSchedule)?;
            println!("Schedule cleared");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = Config::load();
    if let Some(catalog) = cli.catalog {
        config.catalog = catalog;
    }
    if let Some(db) = cli.db {
        config.database = Some(db);
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.port);
            serve(&config, port).await?;
        }
        Some(Commands::Courses { department }) => {
            let mut app = app_with_catalog(&config).await?;
            app.dispatch(Event::SelectDepartment(Filter::parse(&department)))?;
            let schedule = app.schedule();
            print!(
                "{}",
                text::render_catalog(&app.visible_courses(), |id| schedule.contains(id))
            );
        }
        Some(Commands::Departments) => {
            let app = app_with_catalog(&config).await?;
            if let Some(catalog) = app.catalog().catalog() {
                for dept in catalog.departments() {
                    println!("{}", dept);
                }
            }
        }
        Some(Commands::Schedule { action }) => {
            run_schedule(&config, action).await?;
        }
        None => {
            serve(&config, config.port).await?;
        }
    }

    Ok(())
}
