mod terminal;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use filedash_core::{
    Dashboard, DashboardConfig, DashboardError, HttpBackend, MutationOutcome, Query, SortKey,
};
use serde::Serialize;
use std::path::PathBuf;
use terminal::{PromptDialog, StatsSink, TerminalSink};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "filedash", about = "Browse and manage analyzed files")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "FILEDASH_URL")]
    base_url: Option<String>,

    /// TOML config file; defaults to the per-user config when present.
    #[arg(long, env = "FILEDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Pause after a confirmed action before applying it, in milliseconds.
    #[arg(long)]
    settle_ms: Option<u64>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// Filename suffix such as `.exe`, or `all`.
    #[arg(long = "type", default_value = "all")]
    type_filter: String,
    /// Risk level such as `critical`, or `all`.
    #[arg(long = "risk", default_value = "all")]
    risk_filter: String,
    /// name, newest, oldest, size or risk.
    #[arg(long, default_value = "")]
    sort: String,
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn query(&self) -> Query {
        Query {
            search_text: self.search.clone(),
            type_filter: self.type_filter.clone(),
            risk_filter: self.risk_filter.clone(),
            sort_key: SortKey::from(self.sort.as_str()),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List files with optional filtering and sorting.
    List(ListArgs),
    /// Show collection statistics.
    Stats,
    /// Delete one file after confirmation.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Remove every file after confirmation.
    Cleanup {
        #[arg(long)]
        yes: bool,
    },
    /// Print the detail page URL for a file.
    View {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct ViewPayload {
    id: String,
    filename: String,
    url: String,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::load_default()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(settle_ms) = cli.settle_ms {
        config.settle_delay_ms = settle_ms;
    }
    if cli.timeout_secs.is_some() {
        config.request_timeout_secs = cli.timeout_secs;
    }
    Ok(config)
}

fn confirm_pending(
    dashboard: &mut Dashboard<HttpBackend>,
    dialog: &mut PromptDialog,
    sink: &mut TerminalSink,
    assume_yes: bool,
) -> Result<Option<MutationOutcome>> {
    let accepted = dialog
        .read_answer(assume_yes)
        .context("unable to read confirmation")?;
    if !accepted {
        dashboard.cancel(dialog);
        info!("cancelled");
        return Ok(None);
    }

    match dashboard.confirm(dialog, sink) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(DashboardError::Load(error)) => {
            Err(error).context("cleanup succeeded but the file list could not be reloaded")
        }
        Err(error) => Err(error.into()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let backend = HttpBackend::new(&config).context("unable to build HTTP client")?;
    let mut dashboard = Dashboard::new(backend, &config);

    match cli.command {
        Command::List(args) => {
            let mut sink = TerminalSink::new(args.json);
            dashboard.load(&mut sink).context("unable to load files")?;
            dashboard.set_query(args.query(), &mut sink);
        }
        Command::Stats => {
            dashboard
                .load(&mut StatsSink)
                .context("unable to load files")?;
        }
        Command::Delete { id, yes } => {
            let mut sink = TerminalSink::new(false);
            dashboard.load(&mut sink).context("unable to load files")?;
            if dashboard.collection().get(&id).is_none() {
                bail!("no file with id {id}");
            }
            let mut dialog = PromptDialog::default();
            dashboard.request_delete(id, &mut dialog);
            confirm_pending(&mut dashboard, &mut dialog, &mut sink, yes)?;
        }
        Command::Cleanup { yes } => {
            let mut sink = TerminalSink::new(false);
            dashboard.load(&mut sink).context("unable to load files")?;
            let mut dialog = PromptDialog::default();
            dashboard.request_cleanup(&mut dialog);
            confirm_pending(&mut dashboard, &mut dialog, &mut sink, yes)?;
        }
        Command::View { id, json } => {
            dashboard
                .load(&mut StatsSink)
                .context("unable to load files")?;
            let record = dashboard
                .collection()
                .get(&id)
                .with_context(|| format!("no file with id {id}"))?;
            let payload = ViewPayload {
                id: record.id.clone(),
                filename: record.filename.clone(),
                url: dashboard.backend().file_info_url(&record.id),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}  {}", payload.filename, payload.url);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}
