mod cli;
mod commands;
mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use jsu::JsuConfig;

use cli::{Cli, Commands};
use commands::UploadArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = JsuConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Upload {
            file,
            upload_url,
            complete_url,
            chunk_size,
            max_retry,
            retry_delay_ms,
            max_retry_delay_ms,
            suffix,
            fields,
            headers,
        } => {
            commands::ensure_file(&file)?;
            let args = UploadArgs {
                file,
                upload_url,
                complete_url,
                chunk_size,
                max_retry,
                retry_delay_ms,
                max_retry_delay_ms,
                suffix,
                fields,
                headers,
            };
            commands::upload(config, args).await
        }
        Commands::Fingerprint {
            method,
            url,
            json,
            headers,
        } => {
            let key = commands::fingerprint_of(&config, &method, &url, json.as_deref(), &headers)?;
            println!("{key}");
            Ok(())
        }
        Commands::Agent { user_agent } => {
            println!("{}", commands::describe_agent(&user_agent)?);
            Ok(())
        }
        Commands::Poll { url, interval_ms, count } => commands::poll(config, url, interval_ms, count).await,
    }
}
