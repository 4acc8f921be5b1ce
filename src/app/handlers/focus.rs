// SPDX-License-Identifier: GPL-3.0-only

//! Tap-to-focus handlers
//!
//! A tap focuses the backend at the matching sensor point and shows the
//! focus indicator, which expires after [`FOCUS_INDICATOR_LIFETIME`] and then
//! fades. A newer tap supersedes the previous one: its timer is cancelled and
//! any of its messages already in flight are dropped by generation.

use crate::app::Viewfinder;
use crate::app::state::Message;
use crate::backends::Point;
use crate::constants::{FOCUS_FADE_DURATION, FOCUS_INDICATOR_LIFETIME};
use tracing::debug;

impl Viewfinder {
    // =========================================================================
    // Focus Handlers
    // =========================================================================

    /// Focus at a surface point
    ///
    /// Ignored while no preview surface exists or after the camera became
    /// unavailable.
    pub fn request_focus(&mut self, point: Point) {
        if self.focus.is_disabled() {
            debug!("Focus disabled, camera unavailable");
            return;
        }
        let Some(surface) = self.preview.surface() else {
            debug!("No preview surface yet, ignoring focus request");
            return;
        };

        let device_point = surface.capture_device_point(point);
        debug!(x = point.x, y = point.y, device = %device_point, "Focus requested");
        self.backend.focus(device_point);

        let generation = self.focus.show(point);
        let timer = self
            .scheduler
            .schedule(FOCUS_INDICATOR_LIFETIME, Message::FocusExpired { generation });
        self.focus.set_timer(timer);
    }

    pub(crate) fn handle_focus_expired(&mut self, generation: u64) {
        if !self.focus.is_current(generation) {
            debug!(generation, "Stale focus expiry ignored");
            return;
        }
        self.focus.clear_timer();
        self.focus.start_fade();
        let timer = self
            .scheduler
            .schedule(FOCUS_FADE_DURATION, Message::FocusFaded { generation });
        self.focus.set_timer(timer);
    }

    pub(crate) fn handle_focus_faded(&mut self, generation: u64) {
        if !self.focus.is_current(generation) {
            debug!(generation, "Stale focus fade ignored");
            return;
        }
        self.focus.clear_timer();
        self.focus.hide();
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::FocusIndicatorState;
    use crate::app::test_support::Harness;
    use crate::backends::Point;
    use crate::constants::{FOCUS_FADE_DURATION, FOCUS_INDICATOR_LIFETIME};
    use std::time::Duration;

    #[test]
    fn test_focus_without_surface_is_noop() {
        let mut h = Harness::new();
        h.viewfinder.request_focus(Point::new(10.0, 10.0));

        assert!(h.backend.focus_points().is_empty());
        assert_eq!(h.viewfinder.focus_indicator(), FocusIndicatorState::Hidden);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_indicator_expires_then_fades() {
        let mut h = Harness::started();
        h.viewfinder.request_focus(Point::new(100.0, 200.0));
        assert_eq!(h.backend.focus_points().len(), 1);
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::Shown { at, .. } if at == Point::new(100.0, 200.0)
        ));

        h.advance(FOCUS_INDICATOR_LIFETIME);
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::FadingOut { .. }
        ));
        assert_eq!(h.viewfinder.pending_focus_timers(), 1);

        h.advance(FOCUS_FADE_DURATION);
        assert_eq!(h.viewfinder.focus_indicator(), FocusIndicatorState::Hidden);
        assert_eq!(h.viewfinder.pending_focus_timers(), 0);
    }

    #[test]
    fn test_new_request_supersedes_pending_expiry() {
        let mut h = Harness::started();
        h.viewfinder.request_focus(Point::new(10.0, 10.0));
        h.advance(Duration::from_millis(600));
        h.viewfinder.request_focus(Point::new(50.0, 50.0));
        assert_eq!(h.viewfinder.pending_focus_timers(), 1);
        assert_eq!(h.scheduler.pending(), 1);

        // First request's deadline passes without effect
        h.advance(Duration::from_millis(500));
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::Shown { at, .. } if at == Point::new(50.0, 50.0)
        ));

        h.advance(Duration::from_millis(500));
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::FadingOut { at, .. } if at == Point::new(50.0, 50.0)
        ));
    }

    #[test]
    fn test_expiry_racing_a_new_request_is_ignored() {
        let mut h = Harness::started();
        h.viewfinder.request_focus(Point::new(10.0, 10.0));

        // Expiry fires and is queued, then a new tap lands before it is processed
        h.scheduler.advance(FOCUS_INDICATOR_LIFETIME);
        h.viewfinder.request_focus(Point::new(70.0, 70.0));
        h.pump();

        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::Shown { at, .. } if at == Point::new(70.0, 70.0)
        ));
        assert_eq!(h.viewfinder.pending_focus_timers(), 1);
    }

    #[test]
    fn test_new_request_during_fade_keeps_indicator() {
        let mut h = Harness::started();
        h.viewfinder.request_focus(Point::new(10.0, 10.0));
        h.advance(FOCUS_INDICATOR_LIFETIME);
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::FadingOut { .. }
        ));

        h.advance(FOCUS_FADE_DURATION / 2);
        h.viewfinder.request_focus(Point::new(40.0, 40.0));
        h.advance(FOCUS_FADE_DURATION);

        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::Shown { at, .. } if at == Point::new(40.0, 40.0)
        ));
        assert_eq!(h.viewfinder.pending_focus_timers(), 1);
        assert_eq!(h.scheduler.pending(), 1);
    }

    #[test]
    fn test_fade_racing_a_new_request_is_ignored() {
        let mut h = Harness::started();
        h.viewfinder.request_focus(Point::new(10.0, 10.0));
        h.advance(FOCUS_INDICATOR_LIFETIME);

        // Fade completion is queued, then a new tap lands before it is processed
        h.scheduler.advance(FOCUS_FADE_DURATION);
        h.viewfinder.request_focus(Point::new(40.0, 40.0));
        h.pump();

        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::Shown { at, .. } if at == Point::new(40.0, 40.0)
        ));
        assert_eq!(h.viewfinder.pending_focus_timers(), 1);

        h.advance(FOCUS_INDICATOR_LIFETIME);
        assert!(matches!(
            h.viewfinder.focus_indicator(),
            FocusIndicatorState::FadingOut { at, .. } if at == Point::new(40.0, 40.0)
        ));
    }
}
