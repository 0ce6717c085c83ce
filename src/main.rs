// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::fs;

use anyhow::{Context, Result};
use sim_dispatch::backends::ampacity::{AmpacityCase, AmpacityDriver, AmpacityParams};
use sim_dispatch::config::{load_and_validate_config, RuntimeBuilder};
use sim_dispatch::engine::{ProcessorEvent, SimulationProcessor};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_case(path: &str) -> Result<AmpacityCase> {
    let text = fs::read_to_string(path).with_context(|| format!("reading case file '{}'", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing case file '{}'", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <config.yaml> <case.json>", args[0]);
        eprintln!("Example: {} configs/sim-dispatch.yaml cases/step-response.json", args[0]);
        std::process::exit(2);
    }

    init_tracing();

    let config = load_and_validate_config(&args[1])
        .with_context(|| format!("loading configuration '{}'", args[1]))?;
    let case = load_case(&args[2])?;
    let (runner, options) = RuntimeBuilder::from_config(&config)?;

    let processor = SimulationProcessor::new(AmpacityDriver::new(), runner, options);
    let mut events = processor.subscribe();

    processor
        .start(AmpacityParams {
            case,
            num_workers: config.processor.max_workers(),
        })
        .await?;

    let mut cancel_sent = false;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ProcessorEvent::Started { num_samples }) => {
                    eprintln!("Processing {} sample(s)...", num_samples);
                }
                Ok(ProcessorEvent::Progress(report)) => {
                    eprintln!(
                        "Processed {} ({} failed), ETA {:.0}s",
                        report.processed, report.failed, report.eta_seconds
                    );
                }
                Ok(ProcessorEvent::Finished) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(_)) => continue,
            },
            _ = tokio::signal::ctrl_c(), if !cancel_sent => {
                eprintln!("Interrupted, canceling...");
                processor.cancel_processing();
                cancel_sent = true;
            }
        }
    }

    processor.wait_until_finished().await;

    let results = processor.results().await;
    println!("{}", serde_json::to_string_pretty(&results)?);

    let failed = results.iter().filter(|result| !result.succeeded).count();
    if processor.was_aborted() || processor.was_canceled() || failed > 0 {
        eprintln!(
            "Run incomplete: {} of {} sample(s) failed{}{}",
            failed,
            processor.num_samples(),
            if processor.was_aborted() { ", aborted" } else { "" },
            if processor.was_canceled() { ", canceled" } else { "" },
        );
        std::process::exit(1);
    }

    Ok(())
}
