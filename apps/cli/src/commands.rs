//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use brandgate_core::{
    Candidate, DirectoryLookup, LookupKind, StaticDirectory, SubmissionBatch, SubmitContext,
    SubmitOutcome, submit, submit_channels,
};
use brandgate_notify::WebhookNotifier;
use brandgate_shared::{
    AppConfig, Channel, CompanyCandidate, Environment, Provenance, RequestId, Requestor,
    SubjectKind, init_config, load_config, resolve_db_path, validate_webhook,
};
use brandgate_storage::Storage;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BrandGate — track brand and company submission requests.
#[derive(Parser)]
#[command(
    name = "brandgate",
    version,
    about = "Record brand/company submission requests and queue them for processing.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Submit one or more subjects for processing.
    Submit {
        /// Subjects to submit. Semicolon-joined values are split.
        #[arg(required = true)]
        subjects: Vec<String>,

        /// What the subjects are.
        #[arg(short, long, value_enum, default_value = "brand")]
        kind: KindArg,

        /// Target channel(s). Repeat for a multi-channel submission.
        #[arg(short, long, value_enum, default_value = "amazon")]
        channel: Vec<ChannelArg>,

        /// Mark subjects as manually entered rather than directory picks.
        #[arg(long)]
        new: bool,

        /// Requestor display name.
        #[arg(long, env = "BRANDGATE_REQUESTOR")]
        requestor: String,

        /// Requestor email address.
        #[arg(long, env = "BRANDGATE_EMAIL")]
        email: String,

        /// JSON file of company candidates from a directory export.
        /// Required for company submissions.
        #[arg(long)]
        companies: Option<PathBuf>,

        /// Environment override (defaults to the configured one).
        #[arg(long, value_enum)]
        env: Option<EnvArg>,
    },

    /// Search a directory export for brand or company candidates.
    Search {
        /// Search term (case-insensitive substring).
        term: String,

        /// What to search for.
        #[arg(short, long, value_enum, default_value = "company")]
        kind: SearchKindArg,

        /// JSON file of company candidates from a directory export.
        #[arg(long)]
        companies: Option<PathBuf>,

        /// JSON file of brand names.
        #[arg(long)]
        brands: Option<PathBuf>,
    },

    /// List recent submission requests.
    List {
        /// Maximum number of rows to show.
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Environment override (defaults to the configured one).
        #[arg(long, value_enum)]
        env: Option<EnvArg>,
    },

    /// Show every row belonging to one submission batch.
    Show {
        /// The batch's request identifier.
        request_id: String,

        /// Environment override (defaults to the configured one).
        #[arg(long, value_enum)]
        env: Option<EnvArg>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subject kind flag.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum KindArg {
    Brand,
    Company,
    Url,
}

impl From<KindArg> for SubjectKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Brand => SubjectKind::Brand,
            KindArg::Company => SubjectKind::Company,
            KindArg::Url => SubjectKind::RetailerUrl,
        }
    }
}

/// Channel flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ChannelArg {
    Amazon,
    Walmart,
    Target,
    Homedepot,
    Lowes,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Amazon => Channel::Amazon,
            ChannelArg::Walmart => Channel::Walmart,
            ChannelArg::Target => Channel::Target,
            ChannelArg::Homedepot => Channel::HomeDepot,
            ChannelArg::Lowes => Channel::Lowes,
        }
    }
}

/// Search kind flag.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum SearchKindArg {
    Brand,
    Company,
}

impl From<SearchKindArg> for LookupKind {
    fn from(arg: SearchKindArg) -> Self {
        match arg {
            SearchKindArg::Brand => LookupKind::Brand,
            SearchKindArg::Company => LookupKind::Company,
        }
    }
}

/// Environment flag.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum EnvArg {
    Prod,
    Test,
}

impl From<EnvArg> for Environment {
    fn from(arg: EnvArg) -> Self {
        match arg {
            EnvArg::Prod => Environment::Prod,
            EnvArg::Test => Environment::Test,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "brandgate=info",
        1 => "brandgate=debug",
        _ => "brandgate=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Submit {
            subjects,
            kind,
            channel,
            new,
            requestor,
            email,
            companies,
            env,
        } => {
            cmd_submit(
                subjects,
                kind,
                &channel,
                new,
                requestor,
                email,
                companies.as_deref(),
                env,
            )
            .await
        }
        Command::Search {
            term,
            kind,
            companies,
            brands,
        } => cmd_search(&term, kind, companies.as_deref(), brands.as_deref()).await,
        Command::List { limit, env } => cmd_list(limit, env).await,
        Command::Show { request_id, env } => cmd_show(&request_id, env).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Open storage per the config, with an optional environment override.
async fn open_storage(config: &AppConfig, env: Option<EnvArg>) -> Result<Storage> {
    let environment = env
        .map(Environment::from)
        .unwrap_or(config.defaults.environment);
    let db_path = resolve_db_path(config)?;
    let storage = Storage::open(&db_path, environment).await?;
    Ok(storage)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_submit(
    subjects: Vec<String>,
    kind: KindArg,
    channels: &[ChannelArg],
    new: bool,
    requestor: String,
    email: String,
    companies: Option<&std::path::Path>,
    env: Option<EnvArg>,
) -> Result<()> {
    // Validate config before doing anything
    let config = load_config()?;
    validate_webhook(&config)?;

    let kind = SubjectKind::from(kind);
    if kind == SubjectKind::Company && companies.is_none() {
        return Err(eyre!(
            "company submissions need --companies pointing at a directory export"
        ));
    }

    let candidates = match companies {
        Some(path) => load_candidates(path)?,
        None => Vec::new(),
    };

    let provenance = if new {
        Provenance::Manual
    } else {
        Provenance::Directory
    };

    let ctx = SubmitContext::with_companies(
        Requestor {
            name: requestor,
            email,
        },
        candidates,
    );

    let batches: Vec<SubmissionBatch> = channels
        .iter()
        .map(|c| SubmissionBatch {
            subjects: subjects.clone(),
            kind,
            channel: Channel::from(*c),
            provenance,
        })
        .collect();

    let storage = open_storage(&config, env).await?;
    let notifier = WebhookNotifier::new(&config.notifier)?;

    info!(
        subjects = subjects.len(),
        channels = batches.len(),
        kind = kind.as_str(),
        "submitting"
    );

    let spinner = submit_spinner();

    if let [batch] = batches.as_slice() {
        let result = submit(&ctx, batch, &storage, &storage, &notifier).await;
        spinner.finish_and_clear();
        let outcome = result?;
        print_outcome(batch.channel, &outcome);
        println!();
    } else {
        let result = submit_channels(&ctx, &batches, &storage, &storage, &notifier).await;
        spinner.finish_and_clear();
        let multi = result?;
        for channel in &multi.channels {
            match &channel.result {
                Ok(outcome) => print_outcome(channel.channel, outcome),
                Err(e) => println!("  {}: failed: {e}", channel.channel.display_name()),
            }
        }
        println!(
            "  Notified: {}",
            if multi.notified { "yes" } else { "no" }
        );
        println!();
    }

    Ok(())
}

fn submit_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message("Submitting...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn print_outcome(channel: Channel, outcome: &SubmitOutcome) {
    println!();
    println!("  Channel:    {}", channel.display_name());
    println!("  Request ID: {}", outcome.request_id);
    println!("  Status:     {:?}", outcome.status);
    for subject in &outcome.subjects {
        let mark = if subject.queued { "queued" } else { "not queued" };
        println!("    - {} ({mark})", subject.subject);
    }
    if let Some(failure) = &outcome.failure {
        println!("  Failure:    {failure}");
    }
    if outcome.fully_queued() {
        println!(
            "  Notified:   {}",
            if outcome.notified { "yes" } else { "no" }
        );
    }
}

/// Load a directory export of company candidates.
fn load_candidates(path: &std::path::Path) -> Result<Vec<CompanyCandidate>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("cannot read '{}': {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| eyre!("invalid company export '{}': {e}", path.display()))
}

async fn cmd_search(
    term: &str,
    kind: SearchKindArg,
    companies: Option<&std::path::Path>,
    brands: Option<&std::path::Path>,
) -> Result<()> {
    match kind {
        SearchKindArg::Company if companies.is_none() => {
            return Err(eyre!("company search needs --companies"));
        }
        SearchKindArg::Brand if brands.is_none() => {
            return Err(eyre!("brand search needs --brands"));
        }
        _ => {}
    }

    let candidates = match companies {
        Some(path) => load_candidates(path)?,
        None => Vec::new(),
    };
    let brand_names: Vec<String> = match brands {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| eyre!("cannot read '{}': {e}", path.display()))?;
            serde_json::from_str(&content)
                .map_err(|e| eyre!("invalid brand export '{}': {e}", path.display()))?
        }
        None => Vec::new(),
    };

    let directory = StaticDirectory::new(brand_names, candidates);
    let results = directory.search(term, LookupKind::from(kind)).await?;

    if results.is_empty() {
        println!("No matches for '{term}'.");
        return Ok(());
    }

    for candidate in &results {
        match candidate {
            Candidate::Brand(name) => println!("{name}"),
            Candidate::Company(c) => println!("{}  [{}]", c.name, c.lead_list_name),
        }
    }
    println!("{} match(es)", results.len());

    Ok(())
}

async fn cmd_list(limit: u32, env: Option<EnvArg>) -> Result<()> {
    let config = load_config()?;
    let storage = open_storage(&config, env).await?;

    let rows = storage.recent_requests(limit).await?;
    if rows.is_empty() {
        println!("No submission requests recorded.");
        return Ok(());
    }

    for row in rows {
        println!(
            "{}  {}  {:<24} {:<28} {:?}",
            row.submitted_at.format("%Y-%m-%d %H:%M"),
            row.request_id,
            row.request_type,
            row.subject_value,
            row.status,
        );
    }

    Ok(())
}

async fn cmd_show(request_id: &str, env: Option<EnvArg>) -> Result<()> {
    let config = load_config()?;
    let storage = open_storage(&config, env).await?;

    let request_id: RequestId = request_id
        .parse()
        .map_err(|e| eyre!("invalid request id '{request_id}': {e}"))?;

    let rows = storage.requests_by_id(&request_id).await?;
    if rows.is_empty() {
        println!("No rows found for {request_id}");
        return Ok(());
    }

    println!();
    println!("  Request ID: {request_id}");
    println!("  Type:       {}", rows[0].request_type);
    println!(
        "  Requestor:  {} <{}>",
        rows[0].requestor_name, rows[0].requestor_email
    );
    println!("  Submitted:  {}", rows[0].submitted_at.to_rfc3339());
    println!("  Subjects:");
    for row in &rows {
        match &row.secondary_value {
            Some(secondary) => {
                println!("    - {} [{}] {:?}", row.subject_value, secondary, row.status)
            }
            None => println!("    - {} {:?}", row.subject_value, row.status),
        }
    }

    let entries = storage.queue_entries_by_request(&request_id).await?;
    println!("  Queue rows: {}", entries.len());
    for entry in &entries {
        println!("    - {} ({})", entry.query_value, entry.query_type);
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
