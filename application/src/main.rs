use std::{io, sync::OnceLock};

use application::{Args, Config, Service};
use service::{infra::Http, loader::State, read::course};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    // Standard output is reserved for the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                            >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args {
        config,
        filter,
        pages,
        latest,
    } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let service_config = config.service().map_err(|e| {
        log::error!("invalid `Config`: {e}");
    })?;
    let http = Http::new(config.backend.url.clone(), config.backend.timeout)
        .map_err(|e| {
            log::error!("failed to initialize `Http` backend: {e}");
        })?;
    let service = Service::new(service_config, http);

    let mut loader = service.loader();
    _ = loader.fetch(&service, filter.into()).await;
    for _ in 1..pages {
        if loader.load_more(&service).await.is_none() {
            break;
        }
    }
    if let State::Error(e) = loader.state() {
        log::error!("failed to load courses: {e}");
    }
    log::info!(
        "loaded {} courses, more available: {}",
        loader.items().len(),
        loader.has_more(),
    );

    let output = match latest {
        Some(limit) => serde_json::to_string_pretty(&course::latest(
            loader.items(),
            limit,
        )),
        None => serde_json::to_string_pretty(&loader.view()),
    }
    .map_err(|e| {
        log::error!("failed to serialize output: {e}");
    })?;
    println!("{output}");

    Ok(())
}
