use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use client_core::{
    load_settings, LookupController, LookupSettings, LookupState, OrderClient, OrderRenderer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "Order ID> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewMode {
    Formatted,
    Raw,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "order_lookup", about = "Fetch an order by id and print it")]
struct Args {
    /// Order to look up. Without it, ids are read line by line from stdin.
    order_id: Option<String>,
    /// Page origin whose port is swapped for the service port.
    #[arg(long)]
    origin: Option<String>,
    #[arg(long)]
    service_port: Option<u16>,
    /// Full service base URL; overrides --origin and --service-port.
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long, value_enum, default_value_t = ViewMode::Both)]
    view: ViewMode,
    /// Print timestamps in UTC instead of local time.
    #[arg(long)]
    utc: bool,
    /// Settings file (defaults to ./order_lookup.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, settings: &mut LookupSettings) {
        if let Some(origin) = &self.origin {
            settings.page_origin = origin.clone();
        }
        if let Some(port) = self.service_port {
            settings.service_port = port;
        }
        if let Some(api_base) = &self.api_base {
            settings.api_base = Some(api_base.clone());
        }
        if self.utc {
            settings.utc = true;
        }
    }
}

/// Writes the terminal state of a lookup. Returns `false` for the error state.
fn write_state(
    out: &mut impl Write,
    err: &mut impl Write,
    state: &LookupState,
    view: ViewMode,
) -> io::Result<bool> {
    match state {
        LookupState::Result(rendered) => {
            if matches!(view, ViewMode::Formatted | ViewMode::Both) {
                write!(out, "{}", rendered.view)?;
            }
            if view == ViewMode::Both {
                writeln!(out)?;
            }
            if matches!(view, ViewMode::Raw | ViewMode::Both) {
                writeln!(out, "{}", rendered.raw)?;
            }
            Ok(true)
        }
        LookupState::Error(message) => {
            writeln!(err, "error: {message}")?;
            Ok(false)
        }
        LookupState::Idle | LookupState::Loading => Ok(true),
    }
}

async fn run_interactive(
    controller: &mut LookupController,
    client: &OrderClient,
    view: ViewMode,
) -> Result<()> {
    let show_prompt = io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if show_prompt {
            print!("{PROMPT}");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let state = controller.lookup(client, &line).await;
        write_state(&mut io::stdout(), &mut io::stderr(), state, view)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    args.apply_to(&mut settings);
    let client = OrderClient::from_settings(&settings)?;
    tracing::debug!(api_base = %client.api_base(), "order service resolved");

    let mut controller =
        LookupController::new(settings.ordering, OrderRenderer::from_utc_flag(settings.utc));

    match &args.order_id {
        Some(order_id) => {
            let state = controller.lookup(&client, order_id).await;
            let ok = write_state(&mut io::stdout(), &mut io::stderr(), state, args.view)?;
            Ok(if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            run_interactive(&mut controller, &client, args.view).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
