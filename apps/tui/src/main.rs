mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use std::sync::Arc;

use app::actions::AppActions;
use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use conflict_explorer::api::DataSource;
use conflict_explorer::config::AppConfig;
use conflict_explorer::filters::{FilterStore, Location};
use conflict_explorer::logging::{init_logging, LogConfig, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let mut config = AppConfig::from_env()?;
    if args.demo {
        config.force_demo("started with --demo");
    }

    let headless = args.headless || !is_terminal();
    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file.clone())
    };
    init_logging(&LogConfig::new(config.debug, log_target))?;

    let source = config.data_source.connect(config.fetch.read_timeout)?;
    tracing::info!(source = %source.describe(), "data source ready");
    if let Some(notice) = source.notice() {
        tracing::warn!("{notice}");
    }

    let reachable = match &source {
        DataSource::Remote(client) => client.is_available().await,
        DataSource::Demo { .. } => true,
    };
    if !reachable {
        tracing::warn!(source = %source.describe(), "API health check failed");
    }

    let actions = AppActions::new(source, config.fetch);
    let location = Arc::new(Location::new());
    let store = FilterStore::from_query(args.query(), location.clone());

    if headless {
        return event::run_headless(&actions, &store.get(), store.today(), args.json).await;
    }

    let mut app = App::new(actions, config.analytics, store, location);
    if !reachable {
        app.status_message = "The events API did not answer its health check".to_string();
    }

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    // Leave the shareable query behind for the user
    println!("?{}", app.location.current());

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
