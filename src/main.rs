use std::error::Error as StdError;
use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use jokebox::{
    cache::{JokePipeline, LruMemoryCache},
    config::{self, CliArgs, Command},
    domain::catalog::JokeContent,
    infra::{redis::RedisCache, telemetry},
    storage::fs::FsOriginStore,
};
use tokio::io::AsyncWriteExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&*error);
        process::exit(1);
    }
}

fn report_application_error(error: &dyn StdError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), Box<dyn StdError + Send + Sync>> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)?;

    telemetry::init(&settings.logging)?;

    let memory = Arc::new(LruMemoryCache::new(
        settings.cache.memory_entry_limit_non_zero(),
    ));
    let shared = Arc::new(RedisCache::connect(&settings.redis).await?);
    let origin = Arc::new(FsOriginStore::new(settings.storage.directory.clone()));
    let pipeline = JokePipeline::new(
        memory,
        shared,
        origin,
        settings.storage.bucket.clone(),
        &settings.cache,
    );

    match cli.command {
        Command::Total => {
            let total = pipeline.total_count().await?;
            println!("{total}");
        }
        Command::Fetch(args) => {
            let content = pipeline.get_by_id(args.id).await?;
            deliver(content, args.output.as_deref()).await?;
        }
        Command::Random(args) => {
            let content = pipeline.get_random().await?;
            deliver(content, args.output.as_deref()).await?;
        }
    }

    Ok(())
}

async fn deliver(content: JokeContent, output: Option<&Path>) -> Result<(), std::io::Error> {
    match output {
        Some(path) => {
            tokio::fs::write(path, &content.bytes).await?;
            info!(
                path = %path.display(),
                size = content.bytes.len(),
                content_type = content.content_type.as_deref().unwrap_or("unknown"),
                "joke written"
            );
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&content.bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
