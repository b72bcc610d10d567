use crate::{error::CliError, output::RecordSink, shutdown::StopRequest};
use clap::Parser;
use commands::Commands;
use connectors::elasticsearch::{ElasticsearchClient, dsl::open_scroll_body};
use engine_config::settings::{self, validated::ValidatedSettings};
use engine_processing::producer::SessionStatus;
use engine_runtime::reader::{ScrollReader, options::ReaderOptions};
use planner::query::{duration::format_duration, request::plan_scroll};
use serde_json::json;
use std::{path::Path, process::ExitCode, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "scroll-reader",
    version = "0.1.0",
    about = "Reads a search cluster result set through the scroll protocol"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e {
                CliError::ShutdownRequested => info!("Stopped on request."),
                ref e => error!(error = %e, "scroll-reader failed."),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Read {
            config,
            output,
            limit,
        } => {
            let settings = settings::load_with(Path::new(&config), |file| {
                if limit.is_some() {
                    file.query.limit = limit;
                }
            })?;
            read(settings, output.as_deref()).await
        }
        Commands::Plan { config } => {
            let settings = settings::load(Path::new(&config))?;
            print_plan(&settings)
        }
    }
}

async fn read(settings: ValidatedSettings, output: Option<&str>) -> Result<(), CliError> {
    let stop = StopRequest::on_signals();

    let client = ElasticsearchClient::new(settings.cluster.clone())?;
    let session = settings.session();
    let reader = ScrollReader::new(Arc::new(client))
        .with_options(ReaderOptions::from_settings(&session));

    let mut sink = RecordSink::open(output).await?;
    reader.start(settings.spec.clone())?;

    while !stop.is_raised() {
        // Checked before draining so the final drain picks up the tail.
        let finished = reader.is_session_exhausted();
        let records = reader.drain()?;
        sink.write(&records).await?;
        if finished {
            break;
        }
        if records.is_empty() {
            tokio::select! {
                _ = stop.raised() => {}
                _ = tokio::time::sleep(session.poll_interval) => {}
            }
        }
    }

    sink.write(&stop.settle(&reader).await?).await?;

    let written = sink.finish().await?;
    let progress = reader.progress();
    info!(
        written,
        hits_reported = progress.hits_reported,
        records_delivered = progress.records_delivered,
        decode_failures = progress.decode_failures,
        batches = progress.batches_fetched,
        read_percent = %format!("{:.1}", progress.read_percent() * 100.0),
        "Read finished."
    );

    match reader.status() {
        SessionStatus::Failed(reason) => Err(CliError::SessionFailed(reason)),
        status if stop.interrupted(&status) => Err(CliError::ShutdownRequested),
        _ => Ok(()),
    }
}

fn print_plan(settings: &ValidatedSettings) -> Result<(), CliError> {
    let request = plan_scroll(&settings.spec);
    let client = ElasticsearchClient::new(settings.cluster.clone())?;

    let plan = json!({
        "url": client.search_url(&request)?.to_string(),
        "keep_alive": format_duration(request.keep_alive),
        "limit": settings.spec.limit(),
        "body": open_scroll_body(&request),
    });
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
