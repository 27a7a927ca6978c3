mod assignees;
mod cli;
mod config;
mod domain;
mod error;
mod model;
mod plan;
mod providers;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("! {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(command.verbose());

    if let Err(e) = cli::run(command).await {
        eprintln!("! {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
