use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use alf_core::{adapter, Config, EventAdapter};

#[derive(Parser)]
#[command(name = "alf", about = "Azure Log Funnel — normalize Azure log payloads to NDJSON")]
struct Cli {
    /// Payload files, one JSON payload per file. Reads a single payload
    /// from stdin when no files are given.
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log.level.clone())),
        )
        .init();

    let adapter = EventAdapter::new(&config)?;

    let payloads = read_payloads(&cli.files)?;
    for payload in &payloads {
        let entries = adapter.transform(payload);
        if entries.is_empty() {
            tracing::info!("no entries to send");
            continue;
        }
        tracing::debug!(
            count = entries.len(),
            resources = ?adapter::resource_ids(&entries),
            "normalized payload"
        );
        for entry in &entries {
            println!("{}", serde_json::to_string(entry)?);
        }
    }
    Ok(())
}

fn read_payloads(files: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    if files.is_empty() {
        let mut payload = String::new();
        std::io::stdin().read_to_string(&mut payload)?;
        return Ok(vec![payload]);
    }
    files
        .iter()
        .map(|path| Ok(std::fs::read_to_string(path)?))
        .collect()
}
