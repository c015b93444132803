mod config;
mod render;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use moderation::{
    DateRange, ModerationConsole, PassOutcome, QueryCriteria, RequestStatus, SortDirection,
    SortKey, StatusFilter, SubmitOutcome,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "moderate", version, about = "Review conference change requests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List requests with their conference details
    List(ListArgs),
    /// Approve, reject or reset one request
    Review {
        /// Request id
        request_id: String,
        /// Target status (pending, approved, rejected)
        #[arg(long)]
        status: RequestStatus,
        /// Reviewer comment sent with the update
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show how many requests are in each status
    Counts,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,
    /// Case-insensitive title search
    #[arg(long)]
    search: Option<String>,
    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = SortArg::Created)]
    sort: SortArg,
    /// Defaults to A-Z for titles and newest first for timestamps
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Print the displayed records as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    All,
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Approved => StatusFilter::Approved,
            StatusArg::Rejected => StatusFilter::Rejected,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Created,
    Updated,
    Title,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Created => SortKey::CreatedAt,
            SortArg::Updated => SortKey::UpdatedAt,
            SortArg::Title => SortKey::Title,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl ListArgs {
    fn criteria(&self) -> QueryCriteria {
        let sort_key = SortKey::from(self.sort);
        QueryCriteria {
            status_filter: self.status.into(),
            search_term: self.search.clone().unwrap_or_default(),
            created_range: DateRange::new(self.from, self.to),
            sort_key,
            sort_direction: match self.order {
                Some(OrderArg::Asc) => SortDirection::Ascending,
                Some(OrderArg::Desc) => SortDirection::Descending,
                None => sort_key.initial_direction(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moderation=debug,conference_api=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(api_url = %config.api_url, "Loaded configuration");

    let client = Arc::new(config.api_client());
    let console = ModerationConsole::new(client, config.moderation.clone());

    match cli.command {
        Command::List(args) => list(console.with_criteria(args.criteria()), args.json).await,
        Command::Review {
            request_id,
            status,
            comment,
        } => review(&console, &request_id, status, comment).await,
        Command::Counts => counts(&console).await,
    }
}

/// Turn a failed or superseded pass into an error.
fn ensure_loaded(outcome: PassOutcome) -> Result<()> {
    match outcome {
        PassOutcome::Committed { .. } => Ok(()),
        PassOutcome::Failed { error, .. } => Err(error).context("Failed to load requests"),
        PassOutcome::Superseded { generation } => {
            bail!("Aggregation pass {generation} was superseded")
        }
    }
}

async fn list(console: ModerationConsole, json: bool) -> Result<()> {
    ensure_loaded(console.refresh().await)?;
    let displayed = console.displayed();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&displayed).context("Failed to serialize records")?
        );
        return Ok(());
    }

    render::print_criteria(&console.criteria());
    println!();
    render::print_records(&displayed);

    let failed = displayed.iter().filter(|r| !r.has_details()).count();
    if failed > 0 {
        println!(
            "{}",
            format!("{failed} record(s) shown without conference details").bright_yellow()
        );
    }
    Ok(())
}

async fn review(
    console: &ModerationConsole,
    request_id: &str,
    status: RequestStatus,
    comment: Option<String>,
) -> Result<()> {
    ensure_loaded(console.refresh().await)?;

    let record = console
        .record(request_id)
        .with_context(|| format!("No request with id {request_id}"))?;
    if !record.available_actions().contains(&status) {
        bail!("Request {request_id} is already {}", status.as_str().to_lowercase());
    }

    let prompt = console.prompt(status);
    println!("{} {}", prompt.title.bold(), record.title);

    console.begin_moderation(request_id, status)?;
    if let Some(comment) = comment {
        console.set_comment(comment)?;
    }

    match console.submit_moderation().await? {
        SubmitOutcome::Invalid { reason } => {
            console.cancel_moderation()?;
            bail!(reason)
        }
        SubmitOutcome::Failed { error } => Err(error).context("Status update failed"),
        SubmitOutcome::Applied { refresh } => {
            ensure_loaded(refresh)?;
            let updated = console
                .record(request_id)
                .context("Request disappeared after the update")?;
            println!("{}", "✓ Status updated".bright_green());
            render::print_record(&updated);
            Ok(())
        }
    }
}

async fn counts(console: &ModerationConsole) -> Result<()> {
    ensure_loaded(console.refresh().await)?;
    render::print_counts(&console.status_counts());
    Ok(())
}
