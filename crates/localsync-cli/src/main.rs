use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use localsync_cli::{execute, load_config, Cli};
use localsync_core::Store;
use localsync_sqlite::SqliteBackend;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    debug!(db = %cli.db.display(), store = %cli.store, "starting localsync");

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let backend = Arc::new(SqliteBackend::open(&cli.db)?);
    let store = Store::new(cli.store.clone(), backend)?.into_shared();

    let response = execute(&cli.command, &store, &cli.id_attribute, &config)?;
    Ok(serde_json::to_string_pretty(&response)?)
}
