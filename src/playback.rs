//! Autoplay / interaction state machine.
//!
//! Every signal the carousel reacts to is a [`Trigger`]. [`PlaybackSM::handle`]
//! applies one trigger and reports a [`Transition`] telling the driver which
//! timers to touch. Nothing in here sleeps or reads a clock.

use crate::geometry::sanitize_width;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Logical index into the deck, never into the duplicated strip.
    pub current_index: usize,
    pub paused: bool,
    /// Width of one slide plus gap; 0 until the first useful measurement.
    pub slide_px_width: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            paused: false,
            slide_px_width: 0.0,
        }
    }
}

impl PlaybackState {
    /// Horizontal translation for the strip. Held at 0 until a width is known.
    pub fn translation(&self) -> f32 {
        let offset = self.current_index as f32 * self.slide_px_width;
        if offset > 0.0 { -offset } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    AutoplayTick,
    Next,
    Prev,
    Visibility { visible: bool },
    PointerEnter { wide: bool },
    PointerLeave { wide: bool },
    SuppressionExpired,
    Measured(f32),
}

/// What the driver must do with the suppression timer after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionAction {
    Unchanged,
    Restart,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: PlaybackState,
    pub to: PlaybackState,
    pub suppression: SuppressionAction,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// The autoplay timer is rebuilt whenever its inputs change.
    pub fn rearm_autoplay(&self) -> bool {
        self.from.paused != self.to.paused || self.from.slide_px_width != self.to.slide_px_width
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackSM {
    state: PlaybackState,
    slide_count: usize,
    suppression_pending: bool,
}

impl PlaybackSM {
    pub fn new(slide_count: usize) -> Self {
        Self {
            state: PlaybackState::default(),
            slide_count,
            suppression_pending: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppression_pending
    }

    /// True when an autoplay timer should be live.
    pub fn autoplay_active(&self) -> bool {
        !self.state.paused && self.state.slide_px_width > 0.0 && self.slide_count > 0
    }

    pub fn handle(&mut self, trigger: Trigger) -> Transition {
        let from = self.state;
        let mut suppression = SuppressionAction::Unchanged;

        match trigger {
            Trigger::AutoplayTick => {
                // A tick that raced a pause or a zero measurement is dropped.
                if self.autoplay_active() {
                    self.state.current_index = self.step_forward();
                }
            }
            Trigger::Next | Trigger::Prev => {
                self.state.current_index = if trigger == Trigger::Next {
                    self.step_forward()
                } else {
                    self.step_back()
                };
                self.state.paused = true;
                self.suppression_pending = true;
                suppression = SuppressionAction::Restart;
            }
            Trigger::Visibility { visible: false } => {
                self.state.paused = true;
            }
            Trigger::Visibility { visible: true } => {
                self.state.paused = self.suppression_pending;
            }
            Trigger::PointerEnter { wide } => {
                if wide {
                    self.state.paused = true;
                }
            }
            Trigger::PointerLeave { wide } => {
                if wide {
                    self.state.paused = self.suppression_pending;
                }
            }
            Trigger::SuppressionExpired => {
                // Resumes even if the strip is still hidden or hovered.
                self.state.paused = false;
                if self.suppression_pending {
                    self.suppression_pending = false;
                    suppression = SuppressionAction::Clear;
                }
            }
            Trigger::Measured(raw) => {
                self.state.slide_px_width = sanitize_width(raw);
            }
        }

        Transition {
            from,
            to: self.state,
            suppression,
        }
    }

    fn step_forward(&self) -> usize {
        match self.slide_count {
            0 => 0,
            n => (self.state.current_index + 1) % n,
        }
    }

    fn step_back(&self) -> usize {
        match self.slide_count {
            0 => 0,
            n => (self.state.current_index + n - 1) % n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(n: usize, width: f32) -> PlaybackSM {
        let mut sm = PlaybackSM::new(n);
        sm.handle(Trigger::Measured(width));
        sm
    }

    #[test]
    fn starts_at_zero_playing_without_width() {
        let sm = PlaybackSM::new(4);
        assert_eq!(sm.state(), PlaybackState::default());
        assert!(!sm.autoplay_active(), "no autoplay before measurement");
    }

    #[test]
    fn tick_advances_and_wraps() {
        let mut sm = measured(3, 100.0);
        sm.handle(Trigger::AutoplayTick);
        sm.handle(Trigger::AutoplayTick);
        assert_eq!(sm.state().current_index, 2);
        sm.handle(Trigger::AutoplayTick);
        assert_eq!(sm.state().current_index, 0);
    }

    #[test]
    fn tick_is_ignored_while_paused_or_unmeasured() {
        let mut sm = PlaybackSM::new(3);
        assert!(!sm.handle(Trigger::AutoplayTick).changed());

        let mut sm = measured(3, 100.0);
        sm.handle(Trigger::Visibility { visible: false });
        assert!(!sm.handle(Trigger::AutoplayTick).changed());
    }

    #[test]
    fn next_from_last_wraps_to_first() {
        let mut sm = measured(5, 200.0);
        for _ in 0..4 {
            sm.handle(Trigger::AutoplayTick);
        }
        assert_eq!(sm.state().current_index, 4);
        let t = sm.handle(Trigger::Next);
        assert_eq!(t.to.current_index, 0);
        assert!(t.to.paused);
        assert_eq!(t.suppression, SuppressionAction::Restart);
    }

    #[test]
    fn prev_from_first_wraps_to_last() {
        let mut sm = measured(5, 200.0);
        let t = sm.handle(Trigger::Prev);
        assert_eq!(t.to.current_index, 4);
        assert!(sm.is_suppressed());
    }

    #[test]
    fn manual_navigation_restarts_window_even_when_already_paused() {
        let mut sm = measured(5, 200.0);
        sm.handle(Trigger::Next);
        let t = sm.handle(Trigger::Next);
        assert_eq!(t.suppression, SuppressionAction::Restart);
        assert!(!t.rearm_autoplay(), "paused did not change");
    }

    #[test]
    fn index_stays_in_range_for_mixed_sequences() {
        for n in 1..=6 {
            let mut sm = measured(n, 50.0);
            for step in 0..200usize {
                let trigger = match (step * 7 + n) % 5 {
                    0 => Trigger::Next,
                    1 => Trigger::Prev,
                    2 => Trigger::SuppressionExpired,
                    _ => Trigger::AutoplayTick,
                };
                sm.handle(trigger);
                assert!(sm.state().current_index < n);
            }
        }
    }

    #[test]
    fn empty_deck_never_moves() {
        let mut sm = measured(0, 100.0);
        sm.handle(Trigger::Next);
        sm.handle(Trigger::Prev);
        sm.handle(Trigger::AutoplayTick);
        assert_eq!(sm.state().current_index, 0);
        assert!(!sm.autoplay_active());
    }

    #[test]
    fn translation_is_zero_without_width() {
        let mut sm = PlaybackSM::new(5);
        sm.handle(Trigger::Next);
        sm.handle(Trigger::Next);
        assert_eq!(sm.state().current_index, 2);
        assert_eq!(sm.state().translation(), 0.0);
    }

    #[test]
    fn scenario_tick_then_next() {
        let mut sm = measured(5, 200.0);
        sm.handle(Trigger::AutoplayTick);
        assert_eq!(sm.state().current_index, 1);
        assert_eq!(sm.state().translation(), -200.0);

        sm.handle(Trigger::Next);
        assert_eq!(sm.state().current_index, 2);
        assert!(sm.state().paused);

        let t = sm.handle(Trigger::SuppressionExpired);
        assert!(!t.to.paused);
        assert!(t.rearm_autoplay());
        assert_eq!(t.suppression, SuppressionAction::Clear);
        assert!(sm.autoplay_active());
    }

    #[test]
    fn hidden_pauses_regardless_of_window() {
        let mut sm = measured(3, 10.0);
        sm.handle(Trigger::Next);
        let t = sm.handle(Trigger::Visibility { visible: false });
        assert!(t.to.paused);
        assert_eq!(t.suppression, SuppressionAction::Unchanged);
        assert!(sm.is_suppressed());
    }

    #[test]
    fn visible_resumes_only_without_pending_window() {
        let mut sm = measured(3, 10.0);
        sm.handle(Trigger::Visibility { visible: false });
        assert!(!sm.handle(Trigger::Visibility { visible: true }).to.paused);

        sm.handle(Trigger::Next);
        sm.handle(Trigger::Visibility { visible: false });
        assert!(sm.handle(Trigger::Visibility { visible: true }).to.paused);
    }

    #[test]
    fn hover_only_counts_on_wide_viewports() {
        let mut sm = measured(3, 10.0);
        assert!(!sm.handle(Trigger::PointerEnter { wide: false }).changed());
        assert!(sm.handle(Trigger::PointerEnter { wide: true }).to.paused);
        assert!(sm.handle(Trigger::PointerLeave { wide: false }).to.paused);
        assert!(!sm.handle(Trigger::PointerLeave { wide: true }).to.paused);
    }

    #[test]
    fn pointer_leave_respects_pending_window() {
        let mut sm = measured(3, 10.0);
        sm.handle(Trigger::PointerEnter { wide: true });
        sm.handle(Trigger::Prev);
        assert!(sm.handle(Trigger::PointerLeave { wide: true }).to.paused);
    }

    #[test]
    fn window_expiry_overrides_hidden_container() {
        // Expiry clears `paused` unconditionally, so a strip that scrolled out
        // of view during the cooldown starts playing again while hidden.
        let mut sm = measured(3, 10.0);
        sm.handle(Trigger::Next);
        sm.handle(Trigger::Visibility { visible: false });
        let t = sm.handle(Trigger::SuppressionExpired);
        assert!(!t.to.paused);
        assert!(sm.autoplay_active());
    }

    #[test]
    fn measurement_change_requests_rearm() {
        let mut sm = PlaybackSM::new(3);
        let t = sm.handle(Trigger::Measured(120.0));
        assert!(t.rearm_autoplay());
        assert!(!sm.handle(Trigger::Measured(120.0)).rearm_autoplay());
        let t = sm.handle(Trigger::Measured(f32::NAN));
        assert_eq!(t.to.slide_px_width, 0.0);
        assert!(!sm.autoplay_active());
    }
}
