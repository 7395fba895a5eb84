use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunetally::{
    cli::{self, SourceKind},
    config, error, utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch new records from a source into the local database
    Ingest(IngestOptions),

    /// Compute statistics over stored records and write report and chart
    Analyze(AnalyzeOptions),

    /// Show row counts of the local database
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct IngestOptions {
    /// Source to ingest from
    #[clap(value_enum)]
    pub source: SourceKind,

    /// Number of stored rows repeated runs converge to
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub target: Option<u64>,

    /// Maximum number of rows inserted by this run
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cap: Option<u64>,

    /// Query term; can be repeated (playlist name, country, artist names)
    #[clap(long = "query", action = ArgAction::Append, num_args = 1)]
    pub query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeOptions {
    /// Source whose stored rows are analyzed
    #[clap(value_enum)]
    pub source: SourceKind,

    /// Number of rows read, ordered by rank
    #[clap(long)]
    pub limit: Option<usize>,

    /// Rank bucket (START-END) for the Last.fm analysis; can be repeated
    #[clap(
        long = "bucket",
        value_parser = utils::parse_rank_range,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub buckets: Vec<(u32, u32)>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Ingest(opt) => {
            cli::ingest(opt.source, &settings, opt.target, opt.cap, opt.query).await
        }
        Command::Analyze(opt) => cli::analyze(opt.source, &settings, opt.limit, opt.buckets).await,
        Command::Info => cli::info(&settings).await,
        Command::Completions(_) => {}
    }
}
