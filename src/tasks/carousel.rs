use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::events::CarouselInput;
use crate::geometry::{GeometryProvider, LayoutContext};
use crate::playback::{PlaybackSM, SuppressionAction, Trigger};
use crate::render::{Composer, Frame};
use crate::timer::TimerSlot;

/// A mounted carousel: feed it inputs, watch its frames, unmount when done.
#[derive(Debug)]
pub struct CarouselHandle {
    pub inputs: mpsc::Sender<CarouselInput>,
    pub frames: watch::Receiver<Frame>,
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl CarouselHandle {
    /// Latest published frame.
    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    pub async fn send(&self, input: CarouselInput) -> Result<()> {
        self.inputs
            .send(input)
            .await
            .context("carousel task is no longer running")
    }

    /// Cancels every timer and waits for the task to finish.
    pub async fn unmount(self) -> Result<()> {
        self.cancel.cancel();
        self.task.await.context("carousel task panicked")?
    }
}

/// Spawns the carousel task and publishes its first frame immediately.
pub fn mount<G>(cfg: Configuration, geometry: G) -> CarouselHandle
where
    G: GeometryProvider + 'static,
{
    let (input_tx, input_rx) = mpsc::channel::<CarouselInput>(32);
    let composer = Composer::new(&cfg.slides, &cfg);
    let initial = composer.compose(
        &PlaybackSM::new(cfg.slides.len()).state(),
        cfg.is_wide(cfg.initial_viewport_width),
    );
    let (frame_tx, frame_rx) = watch::channel(initial);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(cfg, geometry, input_rx, frame_tx, cancel.clone()));
    CarouselHandle {
        inputs: input_tx,
        frames: frame_rx,
        cancel,
        task,
    }
}

/// Drives one mounted carousel until `cancel` fires.
///
/// Rules:
/// - Geometry is measured once after `initial-measure-delay` and again on
///   every resize.
/// - The autoplay timer is rebuilt whenever `paused` or the slide width
///   changes, so at most one is ever live and each activation starts a full
///   interval.
/// - Manual navigation always restarts the suppression timer.
/// - A closed input channel stops input handling but not autoplay.
pub async fn run<G: GeometryProvider>(
    cfg: Configuration,
    mut geometry: G,
    mut inputs: mpsc::Receiver<CarouselInput>,
    frames: watch::Sender<Frame>,
    cancel: CancellationToken,
) -> Result<()> {
    let composer = Composer::new(&cfg.slides, &cfg);
    let mut sm = PlaybackSM::new(cfg.slides.len());
    let mut viewport_width = cfg.initial_viewport_width;
    let mut wide = cfg.is_wide(viewport_width);
    let mut inputs_open = true;

    let mut initial_measure = TimerSlot::new("initial-measure");
    let mut autoplay = TimerSlot::new("autoplay");
    let mut suppression = TimerSlot::new("suppression");
    initial_measure.schedule_once(cfg.initial_measure_delay);

    info!(slides = sm.slide_count(), viewport_width, "carousel mounted");

    loop {
        let trigger = select! {
            _ = cancel.cancelled() => break,

            _ = initial_measure.fired() => {
                measure(&mut geometry, viewport_width, composer.strip().len())
            }

            _ = suppression.fired() => Some(Trigger::SuppressionExpired),

            _ = autoplay.fired() => Some(Trigger::AutoplayTick),

            maybe_input = inputs.recv(), if inputs_open => match maybe_input {
                Some(CarouselInput::Next) => Some(Trigger::Next),
                Some(CarouselInput::Prev) => Some(Trigger::Prev),
                Some(CarouselInput::Visibility { intersection_ratio }) => {
                    let visible = intersection_ratio > 0.0
                        && intersection_ratio >= cfg.visibility_threshold;
                    Some(Trigger::Visibility { visible })
                }
                Some(CarouselInput::PointerEnter) => Some(Trigger::PointerEnter { wide }),
                Some(CarouselInput::PointerLeave) => Some(Trigger::PointerLeave { wide }),
                Some(CarouselInput::Resize { viewport_width: width }) => {
                    viewport_width = width;
                    let now_wide = cfg.is_wide(width);
                    if now_wide != wide {
                        wide = now_wide;
                        frames.send_replace(composer.compose(&sm.state(), wide));
                    }
                    measure(&mut geometry, viewport_width, composer.strip().len())
                }
                None => {
                    debug!("input channel closed; autoplay continues");
                    inputs_open = false;
                    None
                }
            },
        };

        let Some(trigger) = trigger else {
            continue;
        };
        let transition = sm.handle(trigger);

        match transition.suppression {
            SuppressionAction::Restart => suppression.schedule_once(cfg.interaction_cooldown),
            SuppressionAction::Clear => {
                suppression.cancel();
            }
            SuppressionAction::Unchanged => {}
        }

        if transition.rearm_autoplay() {
            autoplay.cancel();
            if sm.autoplay_active() {
                autoplay.schedule_every(cfg.autoplay_interval);
            }
            debug!(
                paused = transition.to.paused,
                slide_px_width = transition.to.slide_px_width,
                armed = autoplay.is_pending(),
                "autoplay re-armed"
            );
        }

        if transition.changed() {
            debug!(
                ?trigger,
                index = transition.to.current_index,
                paused = transition.to.paused,
                suppressed = sm.is_suppressed(),
                "playback transition"
            );
            frames.send_replace(composer.compose(&transition.to, wide));
        }
    }

    initial_measure.cancel();
    autoplay.cancel();
    suppression.cancel();
    info!(index = sm.state().current_index, "carousel unmounted");
    Ok(())
}

fn measure<G: GeometryProvider>(
    geometry: &mut G,
    viewport_width: f32,
    rendered_slides: usize,
) -> Option<Trigger> {
    let layout = LayoutContext {
        viewport_width,
        rendered_slides,
    };
    match geometry.measure_slide(&layout) {
        Some(width) => {
            if width <= 0.0 || !width.is_finite() {
                debug!(width, "slide measured without usable width");
            } else {
                info!(width, viewport_width, "slide width measured");
            }
            Some(Trigger::Measured(width))
        }
        None => {
            debug!(viewport_width, "no rendered slide to measure");
            None
        }
    }
}
