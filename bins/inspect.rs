use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use configs::ConfigStore;
use dotenvy::dotenv;
use tracing::{error, info};

/// Load JSON option files into one store and print what it ends up holding.
#[derive(Debug, Parser)]
#[command(name = "inspect", version)]
struct Args {
    /// Files to load, in order; later files override earlier keys.
    /// Defaults to `$CONFIG_PATH` or `config.json`.
    files: Vec<PathBuf>,

    /// Print only these keys.
    #[arg(short, long = "key")]
    keys: Vec<String>,

    /// Print the merged document as JSON instead of the selected keys.
    #[arg(long)]
    json: bool,

    /// Log format: `compact` or `json`.
    #[arg(long, default_value = "compact")]
    log_format: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // .env may carry RUST_LOG / CONFIG_PATH
    dotenv().ok();
    common::utils::logging::init_logging(&args.log_format);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "inspect_failed", error = %e, "inspect failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let files = if args.files.is_empty() {
        vec![PathBuf::from(configs::default_path())]
    } else {
        args.files.clone()
    };

    let mut store = ConfigStore::new();
    for file in &files {
        store.load_file(file)?;
    }
    info!(event = "loaded", files = files.len(), keys = store.len(), "options loaded");

    if args.json || args.keys.is_empty() {
        println!("{}", serde_json::to_string_pretty(&store.to_json())?);
        return Ok(());
    }
    for key in &args.keys {
        match store.get(key) {
            Some(value) => println!("{key} = {}", serde_json::to_string(value)?),
            None => println!("{key} is not set"),
        }
    }
    Ok(())
}
