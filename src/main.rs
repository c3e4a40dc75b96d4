use clap::{Args, Parser, Subcommand};

use ticket_trace::cmd::analyze::{self, AnalyzeCommandArgs};
use ticket_trace::cmd::config::{self as config_cmd, ConfigArgs};
use ticket_trace::config::AppConfig;
use ticket_trace::{AnalysisPayload, AppContext, AppResult};

#[derive(Parser)]
#[command(
    name = "ticket-trace",
    author,
    version,
    about = "Trace a Jira ticket hierarchy and the GitLab work linked from it"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a ticket, its descendants and the git links they mention.
    Analyze(AnalyzeArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ticket key, e.g. PROJ-123.
    ticket: String,
    /// Override how many levels below the root are expanded.
    #[arg(long)]
    max_depth: Option<usize>,
    /// Abort the analysis after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Maximum number of Jira and GitLab requests in flight at once.
    #[arg(long)]
    concurrency: Option<usize>,
    /// Print the result as JSON instead of a tree.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> AppResult<()> {
    let mut config = AppConfig::load()?;
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if args.timeout_secs.is_some() {
        config.timeout_secs = args.timeout_secs;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    config.validate()?;

    let context = AppContext::from_config(config);
    let result = analyze::run(
        &context,
        AnalyzeCommandArgs {
            ticket: args.ticket,
        },
    )
    .await;

    if !args.json {
        let report = result?;
        print!("{}", analyze::render_report(&report));
        return Ok(());
    }

    let failed = result.is_err();
    let payload = AnalysisPayload::from(result);
    let rendered = serde_json::to_string_pretty(&payload)
        .map_err(|err| std::io::Error::other(format!("failed to encode result: {err}")))?;
    println!("{rendered}");
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
