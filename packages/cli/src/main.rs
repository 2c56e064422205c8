#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the rescue dashboard.
//!
//! `serve` starts the web dashboard and `summary` prints the per-district
//! counts for a selection straight to the terminal. Without a subcommand the
//! user picks one interactively.

mod summary;

use clap::{Parser, Subcommand};
use dialoguer::{Input, MultiSelect, Select};
use rescue_dashboard_incident_models::{FilterSelection, NeedFlag, TimeWindow};
use rescue_dashboard_query::clock::DashboardClock;
use rescue_dashboard_query::filter::plot_data;
use rescue_dashboard_reader::TableReader;
use rescue_dashboard_server::config::{DEFAULT_DATA_PATH, ServerConfig};

#[derive(Parser)]
#[command(name = "rescue_dashboard", about = "Kerala flood rescue dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Path or URL of the rescue request CSV (overrides `DATA_PATH`)
        #[arg(long)]
        data: Option<String>,
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print per-district request counts for a selection
    Summary {
        /// Path or URL of the rescue request CSV
        #[arg(long, default_value = DEFAULT_DATA_PATH)]
        data: String,
        /// Comma-separated incident types (e.g. "needrescue,needmed").
        /// Defaults to `needrescue`; pass an empty string to select nothing.
        #[arg(long)]
        types: Option<String>,
        /// Time window (e.g. "`requested_today`"). Defaults to `All`.
        #[arg(long)]
        window: Option<String>,
        /// UTC offset for the calendar windows (e.g. "+05:30")
        #[arg(long, default_value = "UTC")]
        utc_offset: String,
        /// Also print the hover text of every plotted request
        #[arg(long)]
        hover: bool,
    },
}

/// Top-level choices offered when no subcommand is given.
enum Tool {
    Server,
    Summary,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Summary];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start dashboard server",
            Self::Summary => "Summarize requests",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive().await;
    };

    match command {
        Commands::Serve { data, bind, port } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(data) = data {
                config.data_source = data;
            }
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(ServerTask::Configured(config)).await?;
        }
        Commands::Summary {
            data,
            types,
            window,
            utc_offset,
            hover,
        } => {
            let selection = FilterSelection::from_query(types.as_deref(), window.as_deref())?;
            let clock = DashboardClock::from_offset_str(&utc_offset)?;
            print_summary(&data, &selection, &clock, hover).await?;
        }
    }

    Ok(())
}

async fn interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("Kerala Rescue Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => serve(ServerTask::Interactive).await?,
        Tool::Summary => {
            let data: String = Input::new()
                .with_prompt("Request table (path or URL)")
                .default(DEFAULT_DATA_PATH.to_string())
                .interact_text()?;

            let type_labels: Vec<&str> = NeedFlag::all().iter().map(|f| f.label()).collect();
            let default_types = FilterSelection::default().incident_types;
            let defaults: Vec<bool> = NeedFlag::all()
                .iter()
                .map(|flag| default_types.contains(flag))
                .collect();
            let chosen = MultiSelect::new()
                .with_prompt("Incident types")
                .items(&type_labels)
                .defaults(&defaults)
                .interact()?;

            let window_labels: Vec<&str> = TimeWindow::all().iter().map(|w| w.label()).collect();
            let window = Select::new()
                .with_prompt("Time window")
                .items(&window_labels)
                .default(0)
                .interact()?;

            let offset: String = Input::new()
                .with_prompt("Calendar UTC offset")
                .default("UTC".to_string())
                .interact_text()?;

            let selection = FilterSelection::new(
                chosen.into_iter().map(|i| NeedFlag::all()[i]),
                TimeWindow::all()[window],
            );
            let clock = DashboardClock::from_offset_str(&offset)?;
            print_summary(&data, &selection, &clock, false).await?;
        }
    }

    Ok(())
}

async fn print_summary(
    source: &str,
    selection: &FilterSelection,
    clock: &DashboardClock,
    show_hover: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = TableReader::new(source).load().await?;
    let data = plot_data(&records, selection, clock);
    print!("{}", summary::render(&data, selection, show_hover));
    Ok(())
}

enum ServerTask {
    Configured(ServerConfig),
    Interactive,
}

async fn serve(task: ServerTask) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it
    // in a blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            match task {
                ServerTask::Configured(config) => {
                    rescue_dashboard_server::run_server(config).await
                }
                ServerTask::Interactive => rescue_dashboard_server::interactive::run().await,
            }
        })
    })
    .await??;

    Ok(())
}
