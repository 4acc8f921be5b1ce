// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder-wide constants
//!
//! Animation timings for the overlays driven by the viewfinder. The host is
//! free to render the transitions however it likes, these values only decide
//! when the viewfinder moves to the next phase of an action.

use std::time::Duration;

/// Time for the camera-switch cover to become opaque before the lens switch
pub const COVER_FADE_IN: Duration = Duration::from_millis(300);

/// Time for the camera-switch cover to clear once the backend has switched
pub const COVER_FADE_OUT: Duration = Duration::from_millis(700);

/// Duration of each half of the shutter flash (in, then out)
pub const SHUTTER_PULSE: Duration = Duration::from_millis(100);

/// Focus indicator scale-down animation after a tap
pub const FOCUS_SHOW_DURATION: Duration = Duration::from_millis(500);

/// How long the focus indicator stays before it starts fading
pub const FOCUS_INDICATOR_LIFETIME: Duration = Duration::from_secs(1);

/// Focus indicator fade-out animation
pub const FOCUS_FADE_DURATION: Duration = Duration::from_millis(300);

/// Scale the focus indicator settles at after the tap animation
pub const FOCUS_INDICATOR_SCALE: f32 = 0.6;

/// Edge length of the square focus indicator, in surface points
pub const FOCUS_INDICATOR_SIZE: f32 = 110.0;

/// Overlay opacity helpers
pub const OPAQUE: f32 = 1.0;
pub const TRANSPARENT: f32 = 0.0;
