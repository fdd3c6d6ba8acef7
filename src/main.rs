//! spacex-dash CLI - SpaceX Launch Records Dashboard
//!
//! Loads the launch dataset and serves the interactive dashboard.
//!
//! Usage:
//!   spacex-dash [OPTIONS]

use std::io::{self, stdout};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use spacex_launch_dash::{
    DashConfig, DashboardLayout, LaunchDataset, find_config_file, load_config_file,
    web::{AppState, ServerConfig, start_server},
    write_summary,
};

/// spacex-dash - Launch site success rates and payload correlations
#[derive(Parser, Debug)]
#[command(name = "spacex-dash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for the web server (default: 8050, or [server].port from config)
    #[arg(long)]
    port: Option<u16>,

    /// Don't open browser automatically when starting the web server
    #[arg(long)]
    no_open: bool,

    /// Config file path (default: search for .spacex-dash.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a dataset summary and exit instead of serving
    #[arg(short, long)]
    summary: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Load configuration file; one that exists but is broken is fatal
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config_file(&std::env::current_dir()?),
    };
    let config: DashConfig = match config_path {
        Some(path) => {
            let config = load_config_file(&path)?;
            info!("Loaded configuration from '{}'", path.display());
            config
        }
        None => {
            debug!("No config file found, using defaults");
            DashConfig::default()
        }
    };
    debug!(?config, "configuration");

    // Ingest failures are fatal: never serve a partial dataset
    let dataset = LaunchDataset::load(&config.data.path)?;
    info!(
        "Loaded {} launch records from '{}'",
        dataset.len(),
        config.data.path.display()
    );

    if args.summary {
        write_summary(&dataset, &mut stdout())?;
        return Ok(());
    }

    let layout = DashboardLayout::build(&dataset, &config.slider_settings());
    debug!(
        sites = layout.site_dropdown.options.len() - 1,
        slider_min = layout.payload_slider.min,
        slider_max = layout.payload_slider.max,
        "layout built"
    );

    let server_config = ServerConfig {
        port: args.port.unwrap_or(config.server.port),
        open_browser: config.server.open_browser && !args.no_open,
        allow_cors: config.server.allow_cors,
    };
    let state = AppState::new(dataset, layout, config.server.max_sessions);

    // Run the web server using tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(start_server(state, server_config))
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    Ok(())
}
