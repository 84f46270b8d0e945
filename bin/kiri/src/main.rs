use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

mod args;
mod response;

use args::KiriArgs;
use response::Response;

async fn run(args: KiriArgs) -> anyhow::Result<PathBuf> {
    let (clipper, url, output) = args.into_clipper()?;
    clipper.clip(&url, &output).await?;
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .try_from_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = KiriArgs::parse();
    let response = match run(args).await {
        Ok(output) => Response::clip(&output),
        Err(e) => {
            tracing::error!("Failed to clip: {e:#}");
            Response::failure(&e)
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
