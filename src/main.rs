use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use htsget_client::{Client, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing; stdout may carry the data, so log to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let params = config.parameters()?;
    let client = Client::with_timeouts(config.timeout(), config.body_timeout());

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);

            let result = client
                .retrieve(&config.url, &mut writer, &params)
                .map_err(anyhow::Error::from)
                .and_then(|_| writer.flush().map_err(anyhow::Error::from));

            if let Err(e) = result {
                // Partial output is not a valid file
                drop(writer);
                if let Err(rm) = fs::remove_file(path) {
                    tracing::warn!("failed to remove {}: {}", path.display(), rm);
                }
                return Err(e);
            }
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            client.retrieve(&config.url, &mut writer, &params)?;
            writer.flush()?;
        }
    }

    Ok(())
}
