//! `climaquote` binary entry point.

use std::process::ExitCode;

use clap::Parser;

use climaquote_cli::cli::Cli;
use climaquote_cli::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match climaquote_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<AppError>()
                .map(|e| e.code.exit_code())
                .unwrap_or(1);
            eprintln!("error: {:#}", err);
            ExitCode::from(code)
        }
    }
}
