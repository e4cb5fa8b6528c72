use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "panelfeed")]
#[command(about = "Webcomic feed normalizer: one clean strip feed per comic")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported comic sources
    Sources,

    /// Fetch a source's feed and print the normalized strips
    Fetch {
        /// Source name (see `sources`)
        source: String,

        /// Only keep strips published at or after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Fetch new strips and persist them to the local database
    Sync {
        /// Sync a single source instead of all of them
        #[arg(long)]
        source: Option<String>,

        /// Fetch and report, but don't write anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print strips already stored for a source
    Show {
        /// Source name (see `sources`)
        source: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Only the most recent N strips
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Rss,
}
