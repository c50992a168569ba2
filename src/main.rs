//! Lockbroker client entry point

use std::process::ExitCode;

use clap::Parser;

use lockbroker::cli::Cli;
use lockbroker::client;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match client::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
