// Registers a toy stream with an origin collector and pushes random samples

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use origin_client::config::{ClientConfig, ConfigBuilder, LogLevel};
use origin_client::prelude::*;
use rand::Rng;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Command line arguments for the toy client
#[derive(Parser, Debug)]
#[command(name = "origin_toy", about = "Push random samples to an origin collector")]
struct Args {
    /// Path to a configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the stream to register
    #[arg(short, long, default_value = "toy")]
    stream: String,

    /// Number of samples to push
    #[arg(short = 'n', long, default_value = "10")]
    count: u32,

    /// Delay between samples in milliseconds
    #[arg(short, long, default_value = "1000")]
    interval_ms: u64,
}

fn load(args: &Args) -> Result<ClientConfig> {
    let mut builder = ConfigBuilder::new().use_defaults();
    if let Some(path) = &args.config {
        builder = builder.require_file(path);
    }
    Ok(builder.add_env("ORIGIN").build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load(&args) {
        Ok(config) => {
            origin_client::init_logging(&config.log_level);
            config
        }
        Err(e) => {
            origin_client::init_logging(&LogLevel::Error);
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let schema = Schema::new(args.stream.as_str())?
        .append_typed("toy1", FieldType::Float)?
        .append_typed("toy2", FieldType::Float)?
        .append_typed("toy3", FieldType::String)?
        .append_typed("toy4", FieldType::Int)?;

    let mut client = OriginClient::new(&config);
    let mut stream = client
        .register_stream(schema)
        .with_context(|| format!("Failed to register stream '{}'", args.stream))?;

    let mut rng = rand::rng();
    for n in 0..args.count {
        let sample = stream
            .sample_now()?
            .append("toy1", rng.random::<f64>())?
            .append("toy2", rng.random_range(-100.0f64..100.0))?
            .append("toy3", if n % 2 == 0 { "even" } else { "odd" })?
            .append("toy4", rng.random_range(0..10_000i64))?;

        stream.send(&sample)?;
        info!("Sent sample {}/{}", n + 1, args.count);
        thread::sleep(Duration::from_millis(args.interval_ms));
    }

    info!("Pushed {} samples on stream '{}'", stream.sent(), stream.stream());
    stream.close();
    client.close();
    Ok(())
}
