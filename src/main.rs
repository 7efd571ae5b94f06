//! Headless host for the photo carousel.
//!
//! Mounts one carousel from a YAML config, drives it from a line-oriented
//! script (stdin by default) and prints every frame it publishes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use humantime::format_duration;
use tokio::io::{self, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use photo_carousel::config::Configuration;
use photo_carousel::geometry::{FixedGeometry, GeometryProvider};
use photo_carousel::tasks::{carousel, output, script};

#[derive(Debug, Parser)]
#[command(
    name = "photo-carousel",
    version,
    about = "Auto-advancing looping image carousel"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Read input commands from this file instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
    /// Frame output format
    #[arg(long, value_enum, default_value_t = output::OutputFormat::Json)]
    format: output::OutputFormat,
    /// Measure every slide as this many pixels instead of deriving it from the layout
    #[arg(long, value_name = "PX")]
    fixed_width: Option<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries frames, so logs go to stderr (RUST_LOG controls level, default = info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let Args {
        config,
        script: script_path,
        format,
        fixed_width,
    } = Args::parse();

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated(config.parent())
        .context("invalid configuration values")?;
    tracing::info!(
        slides = cfg.slides.len(),
        autoplay = %format_duration(cfg.autoplay_interval),
        cooldown = %format_duration(cfg.interaction_cooldown),
        breakpoint = cfg.desktop_breakpoint_px,
        "loaded configuration from {}",
        config.display()
    );

    let geometry: Box<dyn GeometryProvider> = match fixed_width {
        Some(px) => Box::new(FixedGeometry(px)),
        None => Box::new(cfg.geometry()),
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; unmounting");
            cancel.cancel();
        });
    }

    let handle = carousel::mount(cfg, geometry);

    let printer = tokio::spawn(output::run(
        handle.frames.clone(),
        io::stdout(),
        format,
        cancel.clone(),
    ));

    let script_result = match &script_path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script {}", path.display()))?;
            script::run(BufReader::new(file), handle.inputs.clone(), cancel.clone()).await
        }
        None => {
            script::run(
                BufReader::new(io::stdin()),
                handle.inputs.clone(),
                cancel.clone(),
            )
            .await
        }
    };

    // Unmount even when the script failed.
    let unmount_result = handle.unmount().await;
    match printer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("output error: {e:?}"),
        Err(e) => tracing::error!("join error: {e}"),
    }

    script_result.context("script failed")?;
    unmount_result.context("carousel task failed")?;
    Ok(())
}
