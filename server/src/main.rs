use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use crawldex_core::Language;
use search::{build_app, load_engine, repl, EngineOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Query a term-frequency index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Index file path
    #[arg(long, default_value = "./index.json")]
    index: PathBuf,
    /// Built-in stop-word list: portuguese, english or none
    #[arg(long, default_value = "portuguese")]
    language: Language,
    /// Stop-word file, one word per line (replaces --language)
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Let every index key containing a query token contribute, not just the first
    #[arg(long, default_value_t = false)]
    all_matches: bool,
}

impl From<IndexArgs> for EngineOptions {
    fn from(args: IndexArgs) -> Self {
        EngineOptions {
            index_path: args.index,
            language: args.language,
            stopwords: args.stopwords,
            first_match_only: !args.all_matches,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read queries from stdin and print `url, score` lines
    Repl {
        #[command(flatten)]
        index: IndexArgs,
        /// Input line that ends the session
        #[arg(long, default_value = repl::EXIT_WORD)]
        exit_word: String,
        /// Print at most this many results per query
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Serve /search over HTTP
    Serve {
        #[command(flatten)]
        index: IndexArgs,
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Repl { index, exit_word, limit } => {
            let opts: EngineOptions = index.into();
            let engine = load_engine(&opts)?;
            let stdin = std::io::stdin();
            repl::run(&engine, stdin.lock(), std::io::stdout(), &exit_word, limit)?;
        }
        Commands::Serve { index, host, port } => {
            let app = build_app(index.into())?;
            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "server listening");
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
