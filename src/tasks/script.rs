//! Line-oriented host script: turns text commands into carousel inputs.
//!
//! ```text
//! # comment
//! resize 1024
//! next
//! wait 3500
//! visible 0.4
//! hidden
//! enter
//! leave
//! prev
//! quit
//! ```

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{CarouselInput, ScriptCommand};

/// Parses one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();
    if let Some(extra) = parts.next() {
        bail!("unexpected argument {extra:?} after {verb}");
    }

    let command = match (verb.as_str(), arg) {
        ("next", None) => ScriptCommand::Input(CarouselInput::Next),
        ("prev", None) => ScriptCommand::Input(CarouselInput::Prev),
        ("enter", None) => ScriptCommand::Input(CarouselInput::PointerEnter),
        ("leave", None) => ScriptCommand::Input(CarouselInput::PointerLeave),
        ("hidden", None) => ScriptCommand::Input(CarouselInput::Visibility {
            intersection_ratio: 0.0,
        }),
        ("visible", ratio) => {
            let intersection_ratio = match ratio {
                Some(raw) => parse_ratio(raw)?,
                None => 1.0,
            };
            ScriptCommand::Input(CarouselInput::Visibility { intersection_ratio })
        }
        ("resize", Some(raw)) => {
            let viewport_width: f32 = raw
                .parse()
                .with_context(|| format!("invalid viewport width {raw:?}"))?;
            if !viewport_width.is_finite() || viewport_width < 0.0 {
                bail!("viewport width must be non-negative, got {raw}");
            }
            ScriptCommand::Input(CarouselInput::Resize { viewport_width })
        }
        ("wait", Some(raw)) => {
            let millis: u64 = raw
                .parse()
                .with_context(|| format!("invalid wait duration {raw:?}"))?;
            ScriptCommand::Wait(Duration::from_millis(millis))
        }
        ("quit", None) => ScriptCommand::Quit,
        ("resize" | "wait", None) => bail!("{verb} requires an argument"),
        ("next" | "prev" | "enter" | "leave" | "hidden" | "quit", Some(_)) => {
            bail!("{verb} takes no argument")
        }
        _ => bail!("unknown command {verb:?}"),
    };
    Ok(Some(command))
}

fn parse_ratio(raw: &str) -> Result<f32> {
    let ratio: f32 = raw
        .parse()
        .with_context(|| format!("invalid intersection ratio {raw:?}"))?;
    if !(0.0..=1.0).contains(&ratio) {
        bail!("intersection ratio must be within [0, 1], got {raw}");
    }
    Ok(ratio)
}

/// Feeds script lines to the carousel until end of input, `quit`, or
/// cancellation.
pub async fn run<R>(
    reader: R,
    inputs: Sender<CarouselInput>,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    loop {
        let line = select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("failed to read script input")?,
        };
        let Some(line) = line else {
            debug!(lines = line_no, "script input exhausted");
            break;
        };
        line_no += 1;

        let command = parse_line(&line).with_context(|| format!("script line {line_no}"))?;
        match command {
            None => {}
            Some(ScriptCommand::Input(input)) => {
                debug!(line = line_no, ?input, "script input");
                if inputs.send(input).await.is_err() {
                    warn!("carousel input channel closed");
                    break;
                }
            }
            Some(ScriptCommand::Wait(duration)) => {
                select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(duration) => {}
                }
            }
            Some(ScriptCommand::Quit) => {
                debug!(line = line_no, "script requested quit");
                break;
            }
        }
    }
    Ok(())
}
