use anyhow::{Context, Result};
use clap::ValueEnum;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::select;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::render::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// One HTML fragment per frame.
    Html,
}

pub fn encode(frame: &Frame, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut line = serde_json::to_string(frame).context("failed to encode frame")?;
            line.push('\n');
            Ok(line)
        }
        OutputFormat::Html => Ok(frame.to_html()),
    }
}

/// Writes the current frame, then every frame published after it, until the
/// publisher goes away or `cancel` fires.
pub async fn run<W>(
    mut frames: watch::Receiver<Frame>,
    mut out: W,
    format: OutputFormat,
    cancel: CancellationToken,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0usize;
    loop {
        let encoded = encode(&frames.borrow_and_update(), format)?;
        out.write_all(encoded.as_bytes())
            .await
            .context("failed to write frame")?;
        out.flush().await.context("failed to flush frame")?;
        written += 1;

        select! {
            _ = cancel.cancelled() => break,
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!(frames = written, "frame output finished");
    Ok(())
}
