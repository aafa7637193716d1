/// Rulechat — interactive console chatbot.
///
/// Usage: rulechat [--rules <file.ron>] [--responses <file.ron>] [--seed <n>] [--explain]
///
/// Type `exit`, `quit`, `bye` or `goodbye` to leave. Ctrl-D ends the
/// conversation with the interruption farewell.
use clap::Parser;
use rulechat::core::session::ConversationSession;
use rulechat::host::{self, HostOptions};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rulechat", version, about = "A rule-based console chatbot")]
struct Args {
    /// RON file with the ordered pattern rules (defaults to the builtin persona)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// RON file with the response pools (defaults to the builtin persona)
    #[arg(long)]
    responses: Option<PathBuf>,

    /// Seed for reply selection, for reproducible transcripts
    #[arg(long)]
    seed: Option<u64>,

    /// Show the classified intent and matched keyword for every turn
    #[arg(long)]
    explain: bool,

    /// Prompt printed before each line of input
    #[arg(long, default_value = "You: ")]
    prompt: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = ConversationSession::builder();
    if let Some(ref path) = args.rules {
        builder = builder.rules_path(path);
    }
    if let Some(ref path) = args.responses {
        builder = builder.responses_path(path);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let mut session = builder.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("Chatbot ready. Type 'exit' to leave.\n");

    let options = HostOptions {
        prompt: args.prompt,
        explain: args.explain,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    match host::run(&mut session, stdin.lock(), stdout.lock(), &options) {
        Ok(stats) => info!(
            turns = stats.turns,
            interrupted = stats.interrupted,
            "conversation finished"
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
