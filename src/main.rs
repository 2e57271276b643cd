mod auth;
mod build;
mod cli;
mod config;
mod error;
mod monitor;
mod notifier;
mod output;
mod providers;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting BuildWatch - AWS CodeBuild monitor");
    let code = cli.execute().await?;

    Ok(ExitCode::from(code))
}
