use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lectern::cli::Cli;
use lectern::config::LecternConfig;
use lectern::error::Result;
use lectern::provider::ApiProvider;
use lectern::transformer::LectureTransformer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lectern=debug")
    } else {
        EnvFilter::new("lectern=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => LecternConfig::load(path).await?,
        None => LecternConfig::load(Path::new("lectern.toml")).await?,
    };

    let provider = ApiProvider::from_env(&config.provider)?;
    let transformer = LectureTransformer::new(provider, config);

    let text = tokio::fs::read_to_string(&cli.input).await?;
    let lecture = transformer
        .transform_to_lecture(&text, cli.duration, !cli.no_examples)
        .await?;

    match &cli.output {
        Some(path) => tokio::fs::write(path, &lecture).await?,
        None => println!("{lecture}"),
    }

    Ok(())
}
