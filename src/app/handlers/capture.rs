// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles camera switching, still capture and flash selection.
//!
//! Both actions are two-phase: a visual transition on the viewfinder side and
//! exactly one backend command, joined by messages. A camera switch and a
//! still capture track their state separately and may overlap; a second
//! switch while one is in progress is ignored.

use crate::app::Viewfinder;
use crate::app::state::{ActionId, CaptureCallback, Message, SwitchPhase};
use crate::constants::{COVER_FADE_IN, COVER_FADE_OUT, OPAQUE, SHUTTER_PULSE, TRANSPARENT};
use crate::flash::FlashMode;
use tracing::{debug, info, warn};

impl Viewfinder {
    // =========================================================================
    // Camera Switch
    // =========================================================================

    /// Mask the view with the cover, then switch lenses behind it
    pub fn switch_camera(&mut self) {
        if self.switch_phase != SwitchPhase::Idle {
            info!(phase = ?self.switch_phase, "Camera switch already in progress, ignoring");
            return;
        }
        info!("Switching camera");
        self.switch_phase = SwitchPhase::CoverFadingIn;
        self.cover.animate_to(OPAQUE, COVER_FADE_IN);
        // Animation timers are not cancelled, the handle is not kept
        let _ = self.scheduler.schedule(COVER_FADE_IN, Message::CoverFadedIn);
    }

    pub(crate) fn handle_cover_faded_in(&mut self) {
        if self.switch_phase != SwitchPhase::CoverFadingIn {
            warn!(phase = ?self.switch_phase, "Unexpected cover fade-in completion");
            return;
        }
        self.cover.settle();
        self.switch_phase = SwitchPhase::BackendPending;
        debug!("Cover opaque, issuing lens switch");
        self.backend
            .switch_camera(self.completion(Message::CameraSwitched));
    }

    pub(crate) fn handle_camera_switched(&mut self) {
        if self.switch_phase != SwitchPhase::BackendPending {
            warn!(phase = ?self.switch_phase, "Unexpected camera switch completion");
            return;
        }
        info!("Camera switched");
        self.switch_phase = SwitchPhase::Resolving;
        self.cover.animate_to(TRANSPARENT, COVER_FADE_OUT);
        let _ = self
            .scheduler
            .schedule(COVER_FADE_OUT, Message::CoverFadedOut);
    }

    pub(crate) fn handle_cover_faded_out(&mut self) {
        if self.switch_phase != SwitchPhase::Resolving {
            warn!(phase = ?self.switch_phase, "Unexpected cover fade-out completion");
            return;
        }
        self.cover.settle();
        self.switch_phase = SwitchPhase::Idle;
    }

    // =========================================================================
    // Still Capture
    // =========================================================================

    /// Flash the shutter overlay and capture a photo of the current preview
    ///
    /// Ignored while no preview surface exists or after the camera became
    /// unavailable. `on_done` runs once the backend has completed, before the
    /// host is told the image is ready.
    pub fn take_picture(&mut self, on_done: Option<CaptureCallback>) {
        if !self.visibility.has_camera {
            debug!("Camera unavailable, ignoring capture");
            return;
        }
        let Some(surface) = self.preview.surface() else {
            debug!("No preview surface yet, ignoring capture");
            return;
        };
        let surface = surface.surface_ref();

        self.shutter_pulse += 1;
        let pulse = self.shutter_pulse;
        self.shutter.animate_to(OPAQUE, SHUTTER_PULSE);
        let _ = self
            .scheduler
            .schedule(SHUTTER_PULSE, Message::ShutterPeaked { pulse });

        let id = self.next_action_id();
        self.pending_captures.insert(id, on_done);
        let location = self
            .location
            .as_ref()
            .and_then(|provider| provider.latest_location());

        info!(
            action = id.0,
            surface = %surface.id,
            tagged = location.is_some(),
            "Capturing photo"
        );
        self.backend
            .capture_photo(surface, location, self.completion(Message::PhotoCaptured(id)));
    }

    pub(crate) fn handle_shutter_peaked(&mut self, pulse: u64) {
        // A newer pulse restarted the flash
        if pulse != self.shutter_pulse {
            return;
        }
        self.shutter.settle();
        self.shutter.animate_to(TRANSPARENT, SHUTTER_PULSE);
        let _ = self
            .scheduler
            .schedule(SHUTTER_PULSE, Message::ShutterFaded { pulse });
    }

    pub(crate) fn handle_shutter_faded(&mut self, pulse: u64) {
        if pulse != self.shutter_pulse {
            return;
        }
        self.shutter.settle();
    }

    pub(crate) fn handle_photo_captured(&mut self, id: ActionId) {
        let Some(on_done) = self.pending_captures.remove(&id) else {
            warn!(action = id.0, "Completion for unknown capture ignored");
            return;
        };
        info!(action = id.0, "Photo captured");
        if let Some(on_done) = on_done {
            on_done.call();
        }
        self.notify(|host| host.image_captured());
    }

    // =========================================================================
    // Flash
    // =========================================================================

    /// Resolve a flash button label and forward the mode to the backend
    pub fn select_flash(&mut self, label: &str) {
        let mode = FlashMode::resolve(label);
        self.set_flash_mode(mode);
    }

    /// Step to the next flash mode
    pub fn cycle_flash(&mut self) {
        self.set_flash_mode(self.flash_mode.next());
    }

    fn set_flash_mode(&mut self, mode: FlashMode) {
        info!(%mode, "Flash mode selected");
        self.flash_mode = mode;
        self.backend.set_flash_mode(mode);
    }
}
