use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep, sleep};
use tracing::trace;

/// A single cancellable timer. Scheduling always replaces whatever was armed
/// before, so a slot can never hold more than one pending deadline.
#[derive(Debug)]
pub struct TimerSlot {
    name: &'static str,
    sleep: Option<Pin<Box<Sleep>>>,
    period: Option<Duration>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sleep: None,
            period: None,
        }
    }

    pub fn schedule_once(&mut self, after: Duration) {
        self.arm(after, None);
    }

    /// Fires every `period`, first fire one full period from now.
    pub fn schedule_every(&mut self, period: Duration) {
        self.arm(period, Some(period));
    }

    /// Drops the pending deadline. Returns whether anything was armed.
    pub fn cancel(&mut self) -> bool {
        self.period = None;
        let was_pending = self.sleep.take().is_some();
        if was_pending {
            trace!(timer = self.name, "timer cancelled");
        }
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.sleep.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|sleep| sleep.deadline())
    }

    /// Resolves when the armed deadline passes; never resolves while idle.
    /// Cancel safe: dropping the future leaves the slot untouched.
    pub async fn fired(&mut self) {
        let Some(sleep) = self.sleep.as_mut() else {
            return future::pending::<()>().await;
        };
        sleep.as_mut().await;
        match self.period {
            Some(period) => {
                let next = sleep.deadline() + period;
                sleep.as_mut().reset(next);
            }
            None => self.sleep = None,
        }
        trace!(timer = self.name, "timer fired");
    }

    fn arm(&mut self, after: Duration, period: Option<Duration>) {
        let replaced = self.sleep.is_some();
        self.sleep = Some(Box::pin(sleep(after)));
        self.period = period;
        trace!(
            timer = self.name,
            after_ms = after.as_millis() as u64,
            periodic = period.is_some(),
            replaced,
            "timer armed"
        );
    }
}
