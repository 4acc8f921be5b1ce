// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder state types

use crate::app::scheduler::TimerHandle;
use crate::backends::{Point, Rect, SessionEvent};
use crate::constants::{FOCUS_INDICATOR_SCALE, FOCUS_INDICATOR_SIZE, FOCUS_SHOW_DURATION};
use crate::orientation::DeviceOrientation;
use std::fmt;
use std::time::Duration;

/// Identifies one in-flight backend action (a still capture)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u64);

/// Caller-supplied callback run when a still capture has completed
pub struct CaptureCallback(Box<dyn FnOnce() + Send>);

impl CaptureCallback {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(callback))
    }

    pub(crate) fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for CaptureCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CaptureCallback")
    }
}

/// Everything the viewfinder reacts to
///
/// User input and host events come from the host through
/// [`crate::app::ViewfinderHandle`]; the remaining variants are posted by
/// timers, backend completions and backend lifecycle events.
#[derive(Debug)]
pub enum Message {
    // ===== Host input =====
    /// Tap on the preview at a surface point
    Tap(Point),
    SwitchCamera,
    TakePicture(Option<CaptureCallback>),
    /// Flash button label selected by the user
    SelectFlash(String),
    /// Advance the flash mode one step and forward it
    CycleFlash,
    /// Layout pass with the host's content bounds and the sampled device orientation
    Layout {
        bounds: Rect,
        orientation: DeviceOrientation,
    },
    DeviceOrientationChanged(DeviceOrientation),
    /// Viewfinder became visible
    Appeared,
    /// Viewfinder is no longer visible
    Disappeared,
    /// Host view torn down
    Shutdown,

    // ===== Backend =====
    Session(SessionEvent),
    CameraSwitched,
    PhotoCaptured(ActionId),

    // ===== Timers =====
    CoverFadedIn,
    CoverFadedOut,
    ShutterPeaked { pulse: u64 },
    ShutterFaded { pulse: u64 },
    FocusExpired { generation: u64 },
    FocusFaded { generation: u64 },
}

/// An overlay property transition the host renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub target: f32,
    pub duration: Duration,
}

/// Opacity of a full-surface overlay (switch cover, shutter flash)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    opacity: f32,
    animation: Option<Animation>,
}

impl Overlay {
    pub fn transparent() -> Self {
        Self {
            opacity: 0.0,
            animation: None,
        }
    }

    /// Opacity reached at the end of the last completed transition
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Transition currently running, if any
    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(crate) fn animate_to(&mut self, target: f32, duration: Duration) {
        self.animation = Some(Animation { target, duration });
    }

    /// Finish the running transition
    pub(crate) fn settle(&mut self) {
        if let Some(animation) = self.animation.take() {
            self.opacity = animation.target;
        }
    }
}

/// Focus indicator as rendered by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FocusIndicatorState {
    #[default]
    Hidden,
    /// Visible at `at`, scaling down to its resting size
    Shown {
        at: Point,
        frame: Rect,
        scale: Animation,
    },
    /// Expired and fading out
    FadingOut { at: Point, frame: Rect },
}

impl FocusIndicatorState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, FocusIndicatorState::Hidden)
    }
}

/// Focus indicator owner
///
/// Each request bumps the generation and replaces the pending timer, so at
/// most one expiry is ever pending and a timer message that raced a newer
/// request is recognized as stale.
#[derive(Debug, Default)]
pub struct FocusIndicator {
    state: FocusIndicatorState,
    generation: u64,
    timer: Option<TimerHandle>,
    disabled: bool,
}

impl FocusIndicator {
    pub fn state(&self) -> FocusIndicatorState {
        self.state
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of pending indicator timers (never more than one)
    pub fn pending_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Show at a new point, superseding any earlier request
    pub(crate) fn show(&mut self, at: Point) -> u64 {
        self.cancel_timer();
        self.generation += 1;
        self.state = FocusIndicatorState::Shown {
            at,
            frame: Rect::centered_square(at, FOCUS_INDICATOR_SIZE),
            scale: Animation {
                target: FOCUS_INDICATOR_SCALE,
                duration: FOCUS_SHOW_DURATION,
            },
        };
        self.generation
    }

    pub(crate) fn start_fade(&mut self) {
        if let FocusIndicatorState::Shown { at, frame, .. } = self.state {
            self.state = FocusIndicatorState::FadingOut { at, frame };
        }
    }

    pub(crate) fn hide(&mut self) {
        self.state = FocusIndicatorState::Hidden;
    }

    pub(crate) fn set_timer(&mut self, timer: TimerHandle) {
        self.cancel_timer();
        self.timer = Some(timer);
    }

    /// Drop the handle of a timer that has just fired
    pub(crate) fn clear_timer(&mut self) {
        self.timer = None;
    }

    pub(crate) fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Hide for good; later requests are ignored
    pub(crate) fn disable(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.state = FocusIndicatorState::Hidden;
        self.disabled = true;
    }
}

/// Visibility flags read by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiVisibility {
    pub has_camera: bool,
    pub flash_control_visible: bool,
    /// Fallback panel with the settings affordance
    pub no_camera_visible: bool,
}

impl Default for UiVisibility {
    fn default() -> Self {
        Self {
            has_camera: true,
            flash_control_visible: true,
            no_camera_visible: false,
        }
    }
}

/// Camera-switch state machine
///
/// `Idle -> CoverFadingIn -> BackendPending -> Resolving -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchPhase {
    #[default]
    Idle,
    /// Cover becoming opaque, switch not issued yet
    CoverFadingIn,
    /// Switch issued, waiting for the backend
    BackendPending,
    /// Backend done, cover clearing
    Resolving,
}

/// Still-capture progress as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    /// Shutter flash running
    ShutterPulsing,
    /// Waiting for at least one capture to complete
    BackendPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_settles_to_target() {
        let mut overlay = Overlay::transparent();
        overlay.animate_to(1.0, Duration::from_millis(300));
        assert_eq!(overlay.opacity(), 0.0);
        assert!(overlay.is_animating());

        overlay.settle();
        assert_eq!(overlay.opacity(), 1.0);
        assert!(!overlay.is_animating());

        // Settling without a transition keeps the opacity
        overlay.settle();
        assert_eq!(overlay.opacity(), 1.0);
    }

    #[test]
    fn test_focus_indicator_generations() {
        let mut focus = FocusIndicator::default();
        let first = focus.show(Point::new(10.0, 10.0));
        let second = focus.show(Point::new(20.0, 20.0));
        assert_ne!(first, second);
        assert!(!focus.is_current(first));
        assert!(focus.is_current(second));

        focus.disable();
        assert!(!focus.is_current(second));
        assert!(focus.is_disabled());
        assert_eq!(focus.state(), FocusIndicatorState::Hidden);
    }
}
